//! `DeepSeek` through an OpenRouter-compatible Chat Completions API.

use super::{AiProvider, BotError, ModelClient, ModelSettings};

/// Non-streaming Chat Completions client.
#[derive(Clone)]
pub struct DeepSeekClient {
    http: reqwest::Client,
    settings: ModelSettings,
}

impl std::fmt::Debug for DeepSeekClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekClient")
            .field("base_url", &self.settings.base_url)
            .field("model", &self.settings.model)
            .finish()
    }
}

impl DeepSeekClient {
    pub fn new(settings: ModelSettings) -> Result<Self, BotError> {
        Ok(Self {
            http: settings.http_client()?,
            settings,
        })
    }
}

#[async_trait::async_trait]
impl ModelClient for DeepSeekClient {
    fn provider(&self) -> AiProvider {
        AiProvider::DeepSeek
    }

    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(BotError::MissingApiKey(AiProvider::DeepSeek))?;

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let resp: serde_json::Value = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| BotError::UnexpectedPayload("completion without content".into()))
    }
}
