//! Model interaction: send one chat request and return the message content.
//!
//! This stage owns the HTTP-level contract of the endpoint: status
//! classification, error-message extraction, the per-call timeout and the
//! optional retry loop. What the content *means* is left to
//! [`crate::pipeline::parse`].
//!
//! ## Retry Strategy
//!
//! Off by default (`max_retries = 0`): one call per invocation, and the
//! first failure is final. When enabled, only transient failures
//! (connection errors, timeouts, 429, 5xx) are retried, with exponential
//! backoff `retry_backoff_ms * 2^(attempt-1)`. Remote 4xx answers and
//! content problems are never retried.

use crate::config::ClientConfig;
use crate::error::InfopageError;
use crate::pipeline::request::{ChatRequest, ContentPart, MessageContent};
use crate::transport::{ChatTransport, HttpReply, OutboundCall};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Send `request` and return the first choice's message content.
///
/// `api_key` must already have been checked by the caller; this function
/// always performs at least one transport call.
pub async fn complete(
    transport: &dyn ChatTransport,
    config: &ClientConfig,
    api_key: &str,
    request: &ChatRequest,
) -> Result<String, InfopageError> {
    let url = config.completions_url();
    let call = OutboundCall {
        url: &url,
        api_key,
        referer: &config.referer,
        app_title: &config.app_title,
        body: request,
    };

    let mut attempt: u32 = 0;
    loop {
        match send_once(transport, call, config.api_timeout_secs).await {
            Ok(content) => return Ok(content),
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                attempt += 1;
                let backoff = backoff_ms(config.retry_backoff_ms, attempt);
                warn!(
                    "Model call failed ({}); retry {}/{} after {}ms",
                    e, attempt, config.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// `base * 2^(attempt-1)`, saturating for hand-built configs.
fn backoff_ms(base: u64, attempt: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

async fn send_once(
    transport: &dyn ChatTransport,
    call: OutboundCall<'_>,
    timeout_secs: u64,
) -> Result<String, InfopageError> {
    let reply = timeout(Duration::from_secs(timeout_secs), transport.send(call))
        .await
        .map_err(|_| InfopageError::Timeout { secs: timeout_secs })??;
    interpret_reply(&reply)
}

/// Classify a raw HTTP reply into message content or an error.
pub fn interpret_reply(reply: &HttpReply) -> Result<String, InfopageError> {
    if !reply.is_success() {
        return Err(InfopageError::Remote {
            status: reply.status,
            message: error_message(reply),
        });
    }

    let parsed: CompletionResponse =
        serde_json::from_str(&reply.body).map_err(|e| InfopageError::MalformedResponse {
            raw: reply.body.clone(),
            detail: format!("response envelope: {e}"),
        })?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "{} input tokens, {} output tokens",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .map(content_text)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(InfopageError::EmptyResponse);
    }
    Ok(content)
}

fn content_text(content: MessageContent) -> String {
    match content {
        MessageContent::Text(s) => s,
        MessageContent::Parts(parts) => parts
            .into_iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(""),
    }
}

/// Best diagnostic for a failed call: `error.message`, then `message`, then
/// a message built from the status line.
fn error_message(reply: &HttpReply) -> String {
    let body: Option<Value> = serde_json::from_str(&reply.body).ok();
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    body.as_ref()
        .and_then(|b| {
            non_empty(b.get("error").and_then(|e| e.get("message")))
                .or_else(|| non_empty(b.get("message")))
        })
        .unwrap_or_else(|| {
            format!("OpenRouter API error: {} {}", reply.status, reply.reason)
                .trim_end()
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u16, body: Value) -> HttpReply {
        HttpReply {
            status,
            reason: String::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn remote_error_uses_nested_message() {
        let err = interpret_reply(&reply(400, json!({ "error": { "message": "X" } }))).unwrap_err();
        assert!(matches!(err, InfopageError::Remote { status: 400, ref message } if message == "X"));
    }

    #[test]
    fn remote_error_falls_back_to_top_level_message() {
        let err = interpret_reply(&reply(502, json!({ "message": "upstream down" }))).unwrap_err();
        assert!(matches!(err, InfopageError::Remote { ref message, .. } if message == "upstream down"));
    }

    #[test]
    fn remote_error_generic_message() {
        let r = HttpReply {
            status: 401,
            reason: "Unauthorized".into(),
            body: "<html>nope</html>".into(),
        };
        let err = interpret_reply(&r).unwrap_err();
        assert_eq!(err.to_string(), "OpenRouter API error: 401 Unauthorized");
    }

    #[test]
    fn empty_error_message_is_ignored() {
        let err = interpret_reply(&reply(500, json!({ "error": { "message": "" } }))).unwrap_err();
        assert_eq!(err.to_string(), "OpenRouter API error: 500");
    }

    #[test]
    fn content_string() {
        let content = interpret_reply(&reply(
            200,
            json!({ "choices": [{ "message": { "content": "{\"a\":1}" } }] }),
        ))
        .unwrap();
        assert_eq!(content, "{\"a\":1}");
    }

    #[test]
    fn content_parts_are_joined() {
        let content = interpret_reply(&reply(
            200,
            json!({ "choices": [{ "message": { "content": [
                { "type": "text", "text": "{\"a\":" },
                { "type": "text", "text": "1}" }
            ] } }] }),
        ))
        .unwrap();
        assert_eq!(content, "{\"a\":1}");
    }

    #[test]
    fn missing_or_empty_content_is_empty_response() {
        for body in [
            json!({ "choices": [] }),
            json!({}),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{ "message": { "content": "" } }] }),
            json!({ "choices": [{}] }),
        ] {
            let err = interpret_reply(&reply(200, body.clone())).unwrap_err();
            assert!(matches!(err, InfopageError::EmptyResponse), "{body}");
        }
    }

    #[test]
    fn non_json_envelope_is_malformed() {
        let r = HttpReply {
            status: 200,
            reason: "OK".into(),
            body: "gateway says hi".into(),
        };
        let err = interpret_reply(&r).unwrap_err();
        assert!(matches!(err, InfopageError::MalformedResponse { ref raw, .. } if raw == "gateway says hi"));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1000);
        assert_eq!(backoff_ms(500, 4), 4000);
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        assert_eq!(backoff_ms(u64::MAX, 3), u64::MAX);
        assert_eq!(backoff_ms(500, 200), u64::MAX);
        assert_eq!(backoff_ms(0, 200), 0);
    }
}
