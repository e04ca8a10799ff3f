//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use multi_ai_chat::config::{
    AppConfig, LoggingConfig, ProvidersConfig, ServerConfig, TranslationConfig, WidgetConfig,
};

/// A request seen by a mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// Shared log of recorded requests.
pub type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// Serve `app` on an ephemeral local port.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Configuration pointing every upstream at `upstream`, with translation off.
pub fn test_config(upstream: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".into(),
        },
        providers: ProvidersConfig {
            gemini_api_key: Some("gemini-test-key".into()),
            gemini_model: "gemini-test".into(),
            gemini_base_url: upstream.to_string(),
            deepseek_api_key: Some("deepseek-test-key".into()),
            deepseek_model: "deepseek/deepseek-chat".into(),
            deepseek_base_url: format!("{upstream}/api/v1"),
            timeout_secs: 5,
        },
        translation: TranslationConfig {
            enabled: false,
            base_url: upstream.to_string(),
            timeout_secs: 5,
        },
        widget: WidgetConfig {
            server_url: "http://127.0.0.1:5000".into(),
            provider: "auto".into(),
            greeting: "¡Hola!".into(),
            greeting_delay_ms: 0,
            failure_message: "Error al conectar con la IA".into(),
        },
        logging: LoggingConfig { json: false },
    }
}
