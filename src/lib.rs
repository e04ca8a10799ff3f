//! Multi-provider chat widget and reply server
//!
//! A small chat application: a widget forwards the user's text and the
//! selected AI provider to a reply endpoint, and renders what comes back.
//!
//! # Architecture
//!
//! - **Widget**: event-driven controller over a view and an HTTP transport
//! - **Server**: Axum server with the chat page and `POST /get_response`
//! - **Bot**: canned replies, Gemini and `DeepSeek` clients, translation and cleanup
//!
//! # Modules
//!
//! - [`widget`]: chat widget controller, views and transport
//! - [`bot`]: reply engine
//! - [`server`]: HTTP routes
//! - [`config`]: layered configuration and CLI

#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod bot;
pub mod config;
pub mod page;
pub mod server;
pub mod widget;

use crate::bot::Responder;
use crate::widget::WidgetSettings;

use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Reply engine.
    pub responder: Arc<Responder>,
    /// Texts and timings of the browser widget.
    pub widget: Arc<WidgetSettings>,
}
