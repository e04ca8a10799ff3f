//! Provider identifiers understood by the reply endpoint.

use std::fmt;

/// Backend selected by the `ai_type` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    /// Canned replies only.
    Predefined,
    /// Google Gemini.
    Gemini,
    /// `DeepSeek` through an OpenRouter-compatible API.
    DeepSeek,
    /// Let the server choose (currently Gemini).
    #[default]
    Auto,
}

impl AiProvider {
    /// All selectable providers, in selector order.
    pub const ALL: [Self; 4] = [Self::Auto, Self::Gemini, Self::DeepSeek, Self::Predefined];

    /// Parse a selector value. Unknown values fall back to [`AiProvider::Auto`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "predefinido" => Self::Predefined,
            "gemini" => Self::Gemini,
            "deepseek" => Self::DeepSeek,
            _ => Self::Auto,
        }
    }

    /// Wire value used by the selector.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Predefined => "predefinido",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::Auto => "auto",
        }
    }

    /// Human-readable label for the selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Predefined => "Respuestas predefinidas",
            Self::Gemini => "Gemini",
            Self::DeepSeek => "DeepSeek",
            Self::Auto => "Automático",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
