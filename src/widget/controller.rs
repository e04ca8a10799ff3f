//! Chat widget controller.
//!
//! The controller owns its view and reacts to three sources: UI events,
//! a one-shot greeting timer, and completion of the request in flight.
//! All of them are handled from a single task, so the view is never
//! touched concurrently.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::message::{Message, Origin, OutboundMessage, ReplyPayload};
use super::transport::{ChatTransport, TransportFailure};
use super::view::{ChatView, Key, UiEvent};

/// Greeting shown shortly after the widget starts.
pub const DEFAULT_GREETING: &str =
    "¡Hola! Soy tu asistente con múltiples IAs. Usa el selector para elegir qué IA quieres usar.";

/// Bot message shown when a request fails for any reason.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Error al conectar con la IA";

/// Delay before the greeting is rendered.
pub const DEFAULT_GREETING_DELAY: Duration = Duration::from_millis(500);

/// Texts and timings used by the controller.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub greeting: String,
    pub greeting_delay: Duration,
    pub failure_message: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            greeting_delay: DEFAULT_GREETING_DELAY,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

type Outcome = Result<ReplyPayload, TransportFailure>;

/// Controller binding a [`ChatView`] to a [`ChatTransport`].
///
/// At most one request is in flight. Submits that arrive while a reply is
/// pending are ignored and leave the input untouched, so replies always
/// render in submission order.
pub struct ChatWidget<V, T> {
    view: V,
    transport: Arc<T>,
    settings: WidgetSettings,
    pending: bool,
}

impl<V: std::fmt::Debug, T> std::fmt::Debug for ChatWidget<V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("view", &self.view)
            .field("settings", &self.settings)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<V, T> ChatWidget<V, T>
where
    V: ChatView,
    T: ChatTransport + 'static,
{
    /// Bind a controller to an already constructed view.
    pub fn new(view: V, transport: Arc<T>, settings: WidgetSettings) -> Self {
        Self {
            view,
            transport,
            settings,
            pending: false,
        }
    }

    /// Whether a request is awaiting its outcome.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Run the event loop until the event channel closes.
    ///
    /// Schedules the greeting, dispatches submits, and renders outcomes.
    /// The loop only returns once the greeting has been shown and no request
    /// is pending; the view is handed back to the caller.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> V {
        let (done_tx, mut done_rx) = mpsc::channel::<Outcome>(1);
        let greeting = tokio::time::sleep(self.settings.greeting_delay);
        tokio::pin!(greeting);

        let mut greeted = false;
        let mut events_open = true;

        info!(name: "widget.started", "Chat widget initialized");

        loop {
            tokio::select! {
                () = &mut greeting, if !greeted => {
                    greeted = true;
                    self.greet();
                }
                Some(outcome) = done_rx.recv(), if self.pending => {
                    self.on_outcome(outcome);
                }
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        if let Some(outbound) = self.handle_event(event) {
                            self.dispatch(outbound, done_tx.clone());
                        }
                    }
                    None => events_open = false,
                },
            }

            if !events_open && !self.pending && greeted {
                break;
            }
        }

        info!(name: "widget.stopped", "Chat widget event loop finished");
        self.view
    }

    /// Apply one UI event. Returns the request to send, if the event submitted one.
    pub fn handle_event(&mut self, event: UiEvent) -> Option<OutboundMessage> {
        match event {
            UiEvent::KeyPress(Key::Enter) | UiEvent::SendClicked => self.submit(),
            UiEvent::KeyPress(Key::Other) => None,
            UiEvent::InputChanged(value) => {
                self.view.set_input_value(&value);
                None
            }
            UiEvent::ProviderSelected(provider) => {
                self.view.select_provider(&provider);
                None
            }
        }
    }

    /// Echo the current input and build the outbound request.
    ///
    /// Empty or whitespace-only input is a no-op.
    pub fn submit(&mut self) -> Option<OutboundMessage> {
        let raw = self.view.input_value();
        let message = raw.trim();
        if message.is_empty() {
            return None;
        }
        if self.pending {
            debug!("Submit ignored while a reply is pending");
            self.view.input_held();
            return None;
        }

        let ai_type = self.view.selected_provider();
        self.render(&format!("{message} [IA: {ai_type}]"), Origin::User);
        self.view.set_input_value("");
        self.pending = true;

        Some(OutboundMessage {
            message: message.to_string(),
            ai_type,
        })
    }

    /// Render a successful reply.
    pub fn on_response(&mut self, payload: ReplyPayload) {
        self.pending = false;
        self.render(&payload.response, Origin::Bot);
    }

    /// Render the fixed failure message and log the cause.
    pub fn on_error(&mut self, failure: &TransportFailure) {
        self.pending = false;
        error!(error = %failure, "Chat request failed");
        let text = self.settings.failure_message.clone();
        self.render(&text, Origin::Bot);
    }

    /// Append a message verbatim and scroll to the end.
    pub fn render(&mut self, text: &str, origin: Origin) {
        self.view.append_message(&Message::new(text, origin));
        self.view.scroll_to_end();
    }

    fn greet(&mut self) {
        let text = self.settings.greeting.clone();
        self.render(&text, Origin::Bot);
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Ok(payload) => self.on_response(payload),
            Err(failure) => self.on_error(&failure),
        }
    }

    fn dispatch(&self, outbound: OutboundMessage, done: mpsc::Sender<Outcome>) {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let outcome = transport.send(outbound).await;
            if done.send(outcome).await.is_err() {
                debug!("Widget stopped before the reply arrived");
            }
        });
    }
}
