//! HTTP transport for chat-completion requests.
//!
//! The clients never talk to `reqwest` directly; they hand an
//! [`OutboundCall`] to a [`ChatTransport`] and get the raw status and body
//! back. [`HttpTransport`] is the production implementation. Tests swap in
//! fakes to count calls or script replies without a network.
//!
//! A transport only moves bytes. Classifying the reply (remote error, empty
//! content, malformed JSON) happens in [`crate::pipeline::llm`].

use crate::error::InfopageError;
use crate::pipeline::request::ChatRequest;
use async_trait::async_trait;
use tracing::debug;

/// One request to the chat-completions endpoint.
#[derive(Clone, Copy)]
pub struct OutboundCall<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
    pub referer: &'a str,
    pub app_title: &'a str,
    pub body: &'a ChatRequest,
}

impl std::fmt::Debug for OutboundCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundCall")
            .field("url", &self.url)
            .field("api_key", &"***")
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("model", &self.body.model)
            .finish()
    }
}

/// Raw HTTP outcome of an [`OutboundCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// Canonical reason phrase, e.g. `"Unauthorized"`; empty when unknown.
    pub reason: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends chat-completion requests.
///
/// Implementations return `Err` only when no HTTP reply was obtained; any
/// status code, including 4xx/5xx, is an `Ok(HttpReply)`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, call: OutboundCall<'_>) -> Result<HttpReply, InfopageError>;
}

/// [`ChatTransport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with no request deadline of its own.
    ///
    /// The per-call bound is `ClientConfig::api_timeout_secs`, applied around
    /// [`ChatTransport::send`] so expiry is always reported as
    /// [`InfopageError::Timeout`].
    pub fn new() -> Result<Self, InfopageError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InfopageError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (connection pool, proxy settings, ...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, call: OutboundCall<'_>) -> Result<HttpReply, InfopageError> {
        let response = self
            .client
            .post(call.url)
            .bearer_auth(call.api_key)
            .header("HTTP-Referer", call.referer)
            .header("X-Title", call.app_title)
            .json(call.body)
            .send()
            .await
            .map_err(|e| InfopageError::Transport {
                detail: error_chain(&e),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InfopageError::Transport {
                detail: format!("reading response body: {}", error_chain(&e)),
            })?;
        debug!("HTTP {} with {} byte body", status.as_u16(), body.len());

        Ok(HttpReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// `reqwest::Error`'s Display omits the cause ("connection refused", TLS,
/// DNS), so walk the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}
