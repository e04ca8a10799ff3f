//! Outbound request to the reply endpoint.

use thiserror::Error;
use url::Url;

use super::message::{OutboundMessage, ReplyPayload};

/// Path of the reply endpoint on the server.
pub const REPLY_PATH: &str = "/get_response";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Any network failure, error status or undecodable payload.
///
/// The widget never distinguishes between these.
#[derive(Debug, Error)]
#[error("transport or decode failure: {reason}")]
pub struct TransportFailure {
    reason: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportFailure {
    /// Failure without an underlying error value.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Single-shot request/response exchange with the server.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one message and wait for exactly one outcome.
    async fn send(&self, outbound: OutboundMessage) -> Result<ReplyPayload, TransportFailure>;
}

/// Form-encoded HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport posting to `{base_url}/get_response`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url.as_ref())?.join(REPLY_PATH)?;
        Ok(Self { endpoint, http })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, outbound: OutboundMessage) -> Result<ReplyPayload, TransportFailure> {
        tracing::debug!(
            endpoint = %self.endpoint,
            ai_type = %outbound.ai_type,
            message_length = outbound.message.len(),
            "Posting chat message"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&[
                ("message", outbound.message.as_str()),
                ("ai_type", outbound.ai_type.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<ReplyPayload>().await?)
    }
}
