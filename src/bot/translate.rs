//! Translation of English model output into Spanish.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::BotError;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]+\b").expect("valid regex"));

/// Common English function words used to guess the language.
const ENGLISH_WORDS: [&str; 58] = [
    "the", "is", "are", "and", "of", "in", "to", "for", "with", "that", "this", "you", "your",
    "it", "its", "he", "she", "they", "them", "their", "our", "we", "what", "when", "where",
    "why", "how", "which", "who", "whom", "whose", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "can", "may", "might", "must", "shall", "about", "above",
    "after", "before", "between", "into", "through", "during", "including", "until", "upon",
    "within",
];

/// Share of English function words above which text is treated as English.
const ENGLISH_RATIO_THRESHOLD: f64 = 0.1;

/// Guess whether `text` is English.
pub fn looks_english(text: &str) -> bool {
    let lower = text.to_lowercase();
    let words: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return false;
    }

    let english = words.iter().filter(|w| ENGLISH_WORDS.contains(*w)).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = english as f64 / words.len() as f64;

    tracing::debug!(
        english_words = english,
        total_words = words.len(),
        ratio,
        "Language detection"
    );
    ratio > ENGLISH_RATIO_THRESHOLD
}

/// Client for the public Google Translate endpoint.
#[derive(Debug, Clone)]
pub struct Translator {
    http: reqwest::Client,
    base_url: String,
}

impl Translator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BotError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Translate `text` to Spanish.
    pub async fn to_spanish(&self, text: &str) -> Result<String, BotError> {
        let url = format!(
            "{}/translate_a/single",
            self.base_url.trim_end_matches('/')
        );
        let body: serde_json::Value = self
            .http
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "es"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        join_segments(&body)
            .ok_or_else(|| BotError::UnexpectedPayload("translation segments missing".into()))
    }

    /// Translate when the text looks English; return it unchanged otherwise or on failure.
    pub async fn maybe_to_spanish(&self, text: &str) -> String {
        if !looks_english(text) {
            return text.to_string();
        }

        tracing::info!(name: "bot.translate", "Translating reply to Spanish");
        match self.to_spanish(text).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}

/// The endpoint answers `[[["translated", "source", ...], ...], ...]`.
fn join_segments(body: &serde_json::Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let joined: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(serde_json::Value::as_str))
        .collect();
    (!joined.is_empty()).then_some(joined)
}
