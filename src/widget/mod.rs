//! Chat widget: controller, views and transport.
//!
//! # Architecture
//!
//! - [`ChatWidget`]: event-driven controller owning a view
//! - [`ChatView`]: rendering surface contract ([`MemoryView`], [`TerminalView`])
//! - [`ChatTransport`]: single-shot exchange with the reply server ([`HttpTransport`])
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use multi_ai_chat::widget::{ChatWidget, HttpTransport, MemoryView, UiEvent, WidgetSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let view = MemoryView::new("gemini");
//! let transport = Arc::new(HttpTransport::new("http://127.0.0.1:5000")?);
//! let widget = ChatWidget::new(view.clone(), transport, WidgetSettings::default());
//!
//! let (events, rx) = tokio::sync::mpsc::channel(16);
//! let handle = tokio::spawn(widget.run(rx));
//! events.send(UiEvent::InputChanged("hola".into())).await?;
//! events.send(UiEvent::SendClicked).await?;
//! drop(events);
//! handle.await?;
//! # Ok(())
//! # }
//! ```

mod controller;
mod message;
mod terminal;
mod transport;
mod view;

pub use controller::{
    ChatWidget, DEFAULT_FAILURE_MESSAGE, DEFAULT_GREETING, DEFAULT_GREETING_DELAY, WidgetSettings,
};
pub use message::{Message, Origin, OutboundMessage, ReplyPayload};
pub use terminal::{SELECT_COMMAND, TerminalView, line_events, spawn_stdin_events};
pub use transport::{ChatTransport, HttpTransport, REPLY_PATH, TransportFailure};
pub use view::{ChatView, Key, MemoryView, UiEvent};
