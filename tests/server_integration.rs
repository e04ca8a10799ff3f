mod common;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Uri, header},
    response::IntoResponse,
};
use axum_test::TestServer;
use multi_ai_chat::bot::Responder;
use multi_ai_chat::config::AppConfig;
use multi_ai_chat::server::{router, state_with_responder};
use serde_json::{Value, json};

use common::{Recorded, RequestLog, closed_addr, spawn_app, test_config};

/// Fake Gemini, OpenRouter and Translate endpoints behind one router.
async fn upstream(State(log): State<RequestLog>, uri: Uri, headers: HeaderMap, body: String) -> impl IntoResponse {
    let path = uri.path().to_string();
    log.lock().unwrap().push(Recorded {
        path: path.clone(),
        query: uri.query().map(ToString::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body,
    });

    if path.ends_with(":generateContent") {
        Json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "**Hola** desde [IA: gemini] Gemini" }] }
            }]
        }))
    } else if path.ends_with("/chat/completions") {
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "## respuesta de deepseek" } }]
        }))
    } else if path == "/translate_a/single" {
        Json(json!([[["El cielo es azul.", "The sky is blue.", null]], null, "en"]))
    } else {
        Json(json!({ "error": "unknown path" }))
    }
}

async fn spawn_upstream(log: RequestLog) -> String {
    let app = Router::new().fallback(upstream).with_state(log);
    format!("http://{}", spawn_app(app).await)
}

fn test_server(config: AppConfig) -> TestServer {
    let responder = Responder::from_config(&config.providers, &config.translation)
        .expect("Failed to build responder");
    TestServer::new(router(state_with_responder(responder, &config))).unwrap()
}

async fn ask(server: &TestServer, message: &str, ai_type: &str) -> String {
    let response = server
        .post("/get_response")
        .form(&[("message", message), ("ai_type", ai_type)])
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["response"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_index_serves_widget_page() {
    let server = test_server(test_config("http://127.0.0.1:9"));
    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    for id in ["chat-box", "user-input", "send-btn", "ai-select"] {
        assert!(html.contains(&format!(r#"id="{id}""#)));
    }
}

#[tokio::test]
async fn test_health() {
    let server = test_server(test_config("http://127.0.0.1:9"));
    server.get("/health").await.assert_text("ok");
}

#[tokio::test]
async fn test_canned_reply_skips_providers() {
    let log = RequestLog::default();
    let base = spawn_upstream(Arc::clone(&log)).await;
    let server = test_server(test_config(&base));

    assert_eq!(
        ask(&server, "Cuéntame un chiste", "gemini").await,
        "¿Qué dice un semáforo a otro? ¡No me mires, me estoy cambiando! 😆"
    );
    assert!(ask(&server, "¿Qué hora es?", "deepseek").await.starts_with("Son las "));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_predefined_returns_default_reply() {
    let server = test_server(test_config("http://127.0.0.1:9"));
    assert_eq!(
        ask(&server, "explícame la relatividad", "predefinido").await,
        "No entendí. ¿Puedes reformular tu pregunta?"
    );
}

#[tokio::test]
async fn test_gemini_reply_is_cleaned() {
    let log = RequestLog::default();
    let base = spawn_upstream(Arc::clone(&log)).await;
    let server = test_server(test_config(&base));

    assert_eq!(ask(&server, "Explícame algo", "gemini").await, "Hola desde Gemini");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(requests[0].query.as_deref(), Some("key=gemini-test-key"));
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "explícame algo");
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_gemini() {
    let log = RequestLog::default();
    let base = spawn_upstream(Arc::clone(&log)).await;
    let server = test_server(test_config(&base));

    assert_eq!(ask(&server, "Explícame algo", "gpt").await, "Hola desde Gemini");
    assert!(log.lock().unwrap()[0].path.ends_with(":generateContent"));
}

#[tokio::test]
async fn test_deepseek_uses_bearer_key() {
    let log = RequestLog::default();
    let base = spawn_upstream(Arc::clone(&log)).await;
    let server = test_server(test_config(&base));

    assert_eq!(
        ask(&server, "Explícame algo", "deepseek").await,
        "Respuesta de deepseek"
    );

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests[0].path, "/api/v1/chat/completions");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer deepseek-test-key")
    );
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent["model"], "deepseek/deepseek-chat");
}

#[tokio::test]
async fn test_missing_api_key_message() {
    let mut config = test_config("http://127.0.0.1:9");
    config.providers.gemini_api_key = None;
    config.providers.deepseek_api_key = Some("  ".into());
    let server = test_server(config);

    assert_eq!(
        ask(&server, "Explícame algo", "gemini").await,
        "Gemini API Key no configurada."
    );
    assert_eq!(
        ask(&server, "Explícame algo", "deepseek").await,
        "DeepSeek API Key no configurada."
    );
}

#[tokio::test]
async fn test_unreachable_provider_message() {
    let base = format!("http://{}", closed_addr().await);
    let server = test_server(test_config(&base));

    assert_eq!(
        ask(&server, "Explícame algo", "deepseek").await,
        "Error consultando DeepSeek"
    );
}

#[tokio::test]
async fn test_english_reply_is_translated() {
    async fn english() -> impl IntoResponse {
        Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "The sky is blue." }] } }]
        }))
    }

    let log = RequestLog::default();
    let translate_base = spawn_upstream(Arc::clone(&log)).await;
    let gemini_base = format!(
        "http://{}",
        spawn_app(Router::new().fallback(english)).await
    );

    let mut config = test_config(&gemini_base);
    config.translation.enabled = true;
    config.translation.base_url = translate_base;
    let server = test_server(config);

    assert_eq!(ask(&server, "Explícame algo", "gemini").await, "El cielo es azul.");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests[0].path, "/translate_a/single");
    assert!(requests[0].query.as_deref().unwrap().contains("tl=es"));
}

async fn english_gemini() -> String {
    async fn english() -> impl IntoResponse {
        Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "The sky is blue." }] } }]
        }))
    }
    format!("http://{}", spawn_app(Router::new().fallback(english)).await)
}

#[tokio::test]
async fn test_unreachable_translator_keeps_reply() {
    let mut config = test_config(&english_gemini().await);
    config.translation.enabled = true;
    config.translation.base_url = format!("http://{}", closed_addr().await);
    let server = test_server(config);

    assert_eq!(ask(&server, "Explícame algo", "gemini").await, "The sky is blue.");
}

#[tokio::test]
async fn test_garbled_translation_keeps_reply() {
    async fn garbled() -> impl IntoResponse {
        Json(json!({ "sentences": [] }))
    }
    let translate_base = format!(
        "http://{}",
        spawn_app(Router::new().fallback(garbled)).await
    );

    let mut config = test_config(&english_gemini().await);
    config.translation.enabled = true;
    config.translation.base_url = translate_base;
    let server = test_server(config);

    assert_eq!(ask(&server, "Explícame algo", "gemini").await, "The sky is blue.");
}

#[tokio::test]
async fn test_missing_message_field() {
    let server = test_server(test_config("http://127.0.0.1:9"));
    let response = server
        .post("/get_response")
        .form(&[("ai_type", "gemini")])
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "response": "Error interno del servidor" }));
}

#[tokio::test]
async fn test_non_form_body() {
    let server = test_server(test_config("http://127.0.0.1:9"));
    let response = server.post("/get_response").text("hola").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "response": "Error interno del servidor" }));
}
