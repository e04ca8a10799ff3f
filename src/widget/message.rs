//! Rendered chat messages and the wire payloads exchanged with the server.

use serde::{Deserialize, Serialize};

/// Who authored a rendered message.
///
/// Used purely for display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Typed by the user.
    User,
    /// Produced by the server or the widget itself.
    Bot,
}

impl Origin {
    /// CSS class used by the HTML page for this origin.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user-message",
            Self::Bot => "bot-message",
        }
    }
}

/// A single rendered message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Text shown verbatim.
    pub text: String,
    /// Author classification.
    pub origin: Origin,
}

impl Message {
    #[must_use]
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }
}

/// Form fields posted to `/get_response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Trimmed user text.
    pub message: String,
    /// Provider identifier taken from the selector.
    pub ai_type: String,
}

/// JSON body returned by `/get_response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    /// Reply text to render as a bot message.
    pub response: String,
}
