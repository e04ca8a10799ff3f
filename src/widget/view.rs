//! View abstraction the controller binds to.
//!
//! A view plays the role of the page's DOM: a text input, a provider
//! selector and an output region. The controller is the only writer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::message::Message;

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Events emitted by a view towards the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A key was pressed in the input field.
    KeyPress(Key),
    /// The send button was pressed.
    SendClicked,
    /// The input field now holds this text.
    InputChanged(String),
    /// The provider selector now holds this value.
    ProviderSelected(String),
}

/// Contract between the controller and its rendering surface.
pub trait ChatView: Send {
    /// Current raw value of the input field.
    fn input_value(&self) -> String;

    /// Replace the input field contents.
    fn set_input_value(&mut self, value: &str);

    /// Value of the provider selector.
    fn selected_provider(&self) -> String;

    /// Change the provider selector.
    fn select_provider(&mut self, provider: &str);

    /// Append a message to the output region. Text is never interpreted as markup.
    fn append_message(&mut self, message: &Message);

    /// Scroll the output region to its end.
    fn scroll_to_end(&mut self);

    /// The input was not sent because a reply is still pending.
    ///
    /// Views that keep the input visible can ignore this.
    fn input_held(&mut self) {}
}

#[derive(Debug, Default)]
struct ViewState {
    input: String,
    provider: String,
    messages: Vec<Message>,
    scroll_top: usize,
}

/// In-memory view.
///
/// Clones share the same state, so a caller can keep a handle while the
/// controller owns another one.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    state: Arc<Mutex<ViewState>>,
}

impl MemoryView {
    /// Create an empty view with the given provider selected.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        let view = Self::default();
        view.lock().provider = provider.into();
        view
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all rendered messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Current scroll offset of the output region.
    #[must_use]
    pub fn scroll_top(&self) -> usize {
        self.lock().scroll_top
    }

    /// Maximum scroll extent: one row per message.
    #[must_use]
    pub fn scroll_height(&self) -> usize {
        self.lock().messages.len()
    }
}

impl ChatView for MemoryView {
    fn input_value(&self) -> String {
        self.lock().input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.lock().input = value.to_string();
    }

    fn selected_provider(&self) -> String {
        self.lock().provider.clone()
    }

    fn select_provider(&mut self, provider: &str) {
        self.lock().provider = provider.to_string();
    }

    fn append_message(&mut self, message: &Message) {
        self.lock().messages.push(message.clone());
    }

    fn scroll_to_end(&mut self) {
        let mut state = self.lock();
        state.scroll_top = state.messages.len();
    }
}
