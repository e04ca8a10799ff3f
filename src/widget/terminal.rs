//! Terminal rendering surface for the widget.
//!
//! Lines typed on stdin become UI events: `/ai <name>` changes the provider
//! selector, anything else fills the input field and presses Enter.

use std::io::Write;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::message::{Message, Origin};
use super::view::{ChatView, Key, UiEvent};

/// Prefix of the provider selection command.
pub const SELECT_COMMAND: &str = "/ai";

/// View writing messages to any [`Write`] sink.
#[derive(Debug)]
pub struct TerminalView<W> {
    out: W,
    input: String,
    provider: String,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, provider: impl Into<String>) -> Self {
        Self {
            out,
            input: String::new(),
            provider: provider.into(),
        }
    }

    /// Consume the view and return its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn selected_provider(&self) -> String {
        self.provider.clone()
    }

    fn select_provider(&mut self, provider: &str) {
        self.provider = provider.to_string();
        let notice = format!("(IA seleccionada: {provider})");
        self.write_line(&notice.dimmed().to_string());
    }

    fn append_message(&mut self, message: &Message) {
        let line = match message.origin {
            Origin::User => format!("{} {}", "tú ›".cyan().bold(), message.text),
            Origin::Bot => format!("{} {}", "bot ›".green().bold(), message.text),
        };
        self.write_line(&line);
    }

    fn scroll_to_end(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!(error = %e, "Failed to flush terminal");
        }
    }

    fn input_held(&mut self) {
        let notice = format!("(esperando respuesta; no enviado: {})", self.input.trim());
        self.write_line(&notice.dimmed().to_string());
    }
}

/// Translate one typed line into the events it stands for.
pub fn line_events(line: &str) -> Vec<UiEvent> {
    if let Some(rest) = line.trim().strip_prefix(SELECT_COMMAND) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let provider = rest.trim();
            if !provider.is_empty() {
                return vec![UiEvent::ProviderSelected(provider.to_string())];
            }
        }
    }
    vec![
        UiEvent::InputChanged(line.to_string()),
        UiEvent::KeyPress(Key::Enter),
    ]
}

/// Read stdin line by line and forward the resulting events.
///
/// The sender is dropped at end of input, which lets the controller finish.
pub fn spawn_stdin_events(events: mpsc::Sender<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    for event in line_events(&line) {
                        if events.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read from stdin");
                    return;
                }
            }
        }
    })
}
