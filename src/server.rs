use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::bot::{INTERNAL_ERROR_REPLY, Responder};
use crate::config::AppConfig;
use crate::page::{chat_content, html_shell};
use crate::widget::{REPLY_PATH, WidgetSettings};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let responder = Responder::from_config(&config.providers, &config.translation)?;
    let app = router(state_with_responder(responder, &config));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        name: "server.started",
        address = %format!("http://{address}"),
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(REPLY_PATH, post(get_response))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Form body posted by the widget.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    /// User message.
    pub message: Option<String>,
    /// Selected provider tag.
    #[serde(default)]
    pub ai_type: Option<String>,
}

/// JSON reply consumed by the widget.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub response: String,
}

/// GET / - Chat page.
async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(html_shell("Chat IA", &chat_content(&state.widget)))
}

/// GET /health - Liveness probe.
async fn health_handler() -> &'static str {
    "ok"
}

/// POST /get_response - Answer one chat message.
///
/// Always answers 200; failures are reported in the `response` text.
async fn get_response(
    State(state): State<AppState>,
    form: Result<Form<ReplyRequest>, FormRejection>,
) -> Json<ReplyResponse> {
    let req = match form {
        Ok(Form(req)) => req,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Invalid reply request");
            return reply(INTERNAL_ERROR_REPLY);
        }
    };

    let Some(message) = req.message else {
        tracing::error!("Reply request without message field");
        return reply(INTERNAL_ERROR_REPLY);
    };
    let ai_type = req.ai_type.unwrap_or_else(|| "auto".to_string());

    let response = state.responder.respond(&message, &ai_type).await;
    reply(response)
}

fn reply(text: impl Into<String>) -> Json<ReplyResponse> {
    Json(ReplyResponse {
        response: text.into(),
    })
}

/// Build application state around an existing responder.
pub fn state_with_responder(responder: Responder, config: &AppConfig) -> AppState {
    AppState {
        responder: Arc::new(responder),
        widget: Arc::new(WidgetSettings::from(&config.widget)),
    }
}
