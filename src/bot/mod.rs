//! Reply engine behind `POST /get_response`.
//!
//! Messages are answered from a small canned table first. Anything else is
//! routed to the model selected by the `ai_type` field, and the model output
//! is translated to Spanish and cleaned up before it is returned.
//!
//! # Clients
//!
//! - [`GeminiClient`]: Google Gemini `generateContent`
//! - [`DeepSeekClient`]: OpenRouter-compatible `chat/completions`
//!
//! # Example
//!
//! ```rust,ignore
//! let responder = Responder::from_config(&config.providers, &config.translation)?;
//! let reply = responder.respond("Hola", "gemini").await;
//! ```

pub mod canned;
pub mod cleanup;
pub mod deepseek;
pub mod gemini;
pub mod provider;
pub mod translate;

pub use deepseek::DeepSeekClient;
pub use gemini::GeminiClient;
pub use provider::AiProvider;
pub use translate::Translator;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::config::{ProvidersConfig, TranslationConfig};

/// Reply used when the request itself cannot be handled.
pub const INTERNAL_ERROR_REPLY: &str = "Error interno del servidor";

const GEMINI_ECHO_TAG: &str = "[IA: gemini]";

/// Failures while talking to a model or the translation service.
#[derive(Debug, Error)]
pub enum BotError {
    /// No API key configured for the provider.
    #[error("{0} API key is not configured")]
    MissingApiKey(AiProvider),

    /// Network failure or error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with an unexpected shape.
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),
}

/// Connection and model settings for one upstream.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Base URL of the API.
    pub base_url: String,
    /// API key; requests fail with [`BotError::MissingApiKey`] when absent.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl ModelSettings {
    fn http_client(&self) -> Result<reqwest::Client, BotError> {
        Ok(reqwest::Client::builder().timeout(self.timeout).build()?)
    }
}

/// A model that turns one prompt into one text reply.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Provider this client talks to.
    fn provider(&self) -> AiProvider;

    /// Ask the model for a complete, non-streamed reply.
    async fn complete(&self, prompt: &str) -> Result<String, BotError>;
}

/// Produces the reply text for one chat message.
#[derive(Clone)]
pub struct Responder {
    gemini: Arc<dyn ModelClient>,
    deepseek: Arc<dyn ModelClient>,
    translator: Option<Translator>,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

impl Responder {
    /// Build a responder from explicit clients.
    pub fn new(
        gemini: Arc<dyn ModelClient>,
        deepseek: Arc<dyn ModelClient>,
        translator: Option<Translator>,
    ) -> Self {
        Self {
            gemini,
            deepseek,
            translator,
        }
    }

    /// Build the HTTP-backed responder described by the configuration.
    pub fn from_config(
        providers: &ProvidersConfig,
        translation: &TranslationConfig,
    ) -> Result<Self, BotError> {
        let timeout = Duration::from_secs(providers.timeout_secs);
        let key = |k: &Option<String>| k.clone().filter(|s| !s.trim().is_empty());

        info!(
            name: "bot.config.loaded",
            gemini_key = providers.gemini_api_key.is_some(),
            deepseek_key = providers.deepseek_api_key.is_some(),
            translation = translation.enabled,
            "Provider configuration loaded"
        );

        let gemini = GeminiClient::new(ModelSettings {
            base_url: providers.gemini_base_url.clone(),
            api_key: key(&providers.gemini_api_key),
            model: providers.gemini_model.clone(),
            timeout,
        })?;
        let deepseek = DeepSeekClient::new(ModelSettings {
            base_url: providers.deepseek_base_url.clone(),
            api_key: key(&providers.deepseek_api_key),
            model: providers.deepseek_model.clone(),
            timeout,
        })?;
        let translator = if translation.enabled {
            Some(Translator::new(
                translation.base_url.clone(),
                Duration::from_secs(translation.timeout_secs),
            )?)
        } else {
            None
        };

        Ok(Self::new(Arc::new(gemini), Arc::new(deepseek), translator))
    }

    /// Answer one message for the given selector value.
    pub async fn respond(&self, message: &str, ai_type: &str) -> String {
        let message = message.to_lowercase();
        let provider = AiProvider::from_tag(ai_type);

        info!(
            name: "bot.request",
            message = %message,
            provider = %provider,
            "Message received"
        );

        if let Some(reply) = canned::canned_reply(&message, chrono::Local::now()) {
            info!(name: "bot.canned", "Answered with canned reply");
            return reply;
        }

        let reply = match provider {
            AiProvider::Predefined => canned::DEFAULT_REPLY.to_string(),
            AiProvider::Gemini | AiProvider::Auto => self.ask(self.gemini.as_ref(), &message).await,
            AiProvider::DeepSeek => self.ask(self.deepseek.as_ref(), &message).await,
        };

        info!(name: "bot.reply", reply_length = reply.len(), "Reply ready");
        reply
    }

    async fn ask(&self, client: &dyn ModelClient, prompt: &str) -> String {
        let provider = client.provider();
        match client.complete(prompt).await {
            Ok(text) => self.polish(provider, &text).await,
            Err(BotError::MissingApiKey(_)) => {
                format!("{} API Key no configurada.", provider.label())
            }
            Err(e) => {
                error!(provider = %provider, error = %e, "Model request failed");
                format!("Error consultando {}", provider.label())
            }
        }
    }

    async fn polish(&self, provider: AiProvider, text: &str) -> String {
        // Only Gemini echoes the selector tag back.
        let text = if provider == AiProvider::Gemini {
            text.replace(GEMINI_ECHO_TAG, "")
        } else {
            text.to_string()
        };
        let text = text.trim();

        let text = match &self.translator {
            Some(translator) => translator.maybe_to_spanish(text).await,
            None => text.to_string(),
        };
        cleanup::clean_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        provider: AiProvider,
        reply: Result<&'static str, fn() -> BotError>,
    }

    #[async_trait::async_trait]
    impl ModelClient for Scripted {
        fn provider(&self) -> AiProvider {
            self.provider
        }

        async fn complete(&self, _prompt: &str) -> Result<String, BotError> {
            self.reply.map(ToString::to_string).map_err(|make| make())
        }
    }

    fn responder(gemini: Result<&'static str, fn() -> BotError>) -> Responder {
        Responder::new(
            Arc::new(Scripted {
                provider: AiProvider::Gemini,
                reply: gemini,
            }),
            Arc::new(Scripted {
                provider: AiProvider::DeepSeek,
                reply: Err(|| BotError::MissingApiKey(AiProvider::DeepSeek)),
            }),
            None,
        )
    }

    #[tokio::test]
    async fn test_canned_before_provider() {
        let reply = responder(Ok("model")).respond("HOLA amigo", "gemini").await;
        assert_eq!(reply, "¡Hola! ¿En qué puedo ayudarte?");
    }

    #[tokio::test]
    async fn test_predefined_default() {
        let reply = responder(Ok("model")).respond("explícame algo", "predefinido").await;
        assert_eq!(reply, canned::DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_auto_uses_gemini_and_polishes() {
        let reply = responder(Ok("**respuesta** [IA: gemini] lista"))
            .respond("explícame algo", "auto")
            .await;
        assert_eq!(reply, "Respuesta lista");
    }

    #[tokio::test]
    async fn test_echo_tag_kept_for_deepseek() {
        let responder = Responder::new(
            Arc::new(Scripted {
                provider: AiProvider::Gemini,
                reply: Ok("unused"),
            }),
            Arc::new(Scripted {
                provider: AiProvider::DeepSeek,
                reply: Ok("respuesta [IA: deepseek]"),
            }),
            None,
        );
        let reply = responder.respond("explícame algo", "deepseek").await;
        assert_eq!(reply, "Respuesta [IA: deepseek]");
    }

    #[tokio::test]
    async fn test_missing_key_message() {
        let reply = responder(Ok("x")).respond("explícame algo", "deepseek").await;
        assert_eq!(reply, "DeepSeek API Key no configurada.");
    }

    #[tokio::test]
    async fn test_upstream_failure_message() {
        let reply = responder(Err(|| BotError::UnexpectedPayload("boom".into())))
            .respond("explícame algo", "gemini")
            .await;
        assert_eq!(reply, "Error consultando Gemini");
    }
}
