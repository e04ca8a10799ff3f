//! Google Gemini `generateContent` client.

use super::{AiProvider, BotError, ModelClient, ModelSettings};

/// Client for `POST /v1beta/models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: ModelSettings,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.settings.base_url)
            .field("model", &self.settings.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(settings: ModelSettings) -> Result<Self, BotError> {
        Ok(Self {
            http: settings.http_client()?,
            settings,
        })
    }
}

#[async_trait::async_trait]
impl ModelClient for GeminiClient {
    fn provider(&self) -> AiProvider {
        AiProvider::Gemini
    }

    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(BotError::MissingApiKey(AiProvider::Gemini))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp: serde_json::Value = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| BotError::UnexpectedPayload("Gemini reply without parts".into()))?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
            .collect();

        tracing::debug!(model = %self.settings.model, content_length = text.len(), "Gemini reply received");
        Ok(text)
    }
}
