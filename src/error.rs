//! Error type for the infopage library.
//!
//! Every failure of an extraction or section revision is normalised into
//! one [`InfopageError`] variant at the client boundary. There is no local
//! recovery and no partial success: a call either yields a value or one of
//! these errors.
//!
//! The variants fall into four groups:
//!
//! * **Preconditions**: raised before any network traffic
//!   ([`InfopageError::MissingCredential`], [`InfopageError::SchemaNotFound`],
//!   the document input errors).
//! * **Remote**: the endpoint answered, but not with a usable result
//!   ([`InfopageError::Remote`], [`InfopageError::EmptyResponse`],
//!   [`InfopageError::MalformedResponse`], [`InfopageError::SchemaMismatch`]).
//! * **Transport**: no HTTP answer at all ([`InfopageError::Transport`],
//!   [`InfopageError::Timeout`]).
//! * **Configuration**: [`InfopageError::InvalidConfig`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the infopage library.
#[derive(Debug, Error)]
pub enum InfopageError {
    // ── Preconditions ─────────────────────────────────────────────────────
    /// No API credential was configured; no request was attempted.
    #[error("OpenRouter API key is missing.\nSet {env_var} or pass a key to ClientConfig::builder().api_key(..).")]
    MissingCredential { env_var: String },

    /// The section name does not match any key of the infographic schema.
    #[error("No schema is registered for section '{key}'")]
    SchemaNotFound { key: String },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// The endpoint returned a non-success HTTP status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The endpoint returned success but no message content.
    #[error("No response from OpenRouter API.")]
    EmptyResponse,

    /// The message content is not valid JSON.
    #[error("Model response is not valid JSON: {detail}")]
    MalformedResponse { raw: String, detail: String },

    /// The message content is valid JSON but does not have the requested shape.
    #[error("Model response does not match the schema: {detail}")]
    SchemaMismatch { detail: String, raw: String },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Request to the model endpoint failed: {detail}")]
    Transport { detail: String },

    /// The request did not complete within the configured timeout.
    #[error("Model call timed out after {secs}s\nIncrease --api-timeout.")]
    Timeout { secs: u64 },

    // ── Document input errors ─────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file is neither a PDF nor a plain-text document.
    #[error("Unsupported document '{path}': only PDF and TXT files are accepted")]
    UnsupportedDocument { path: PathBuf },

    /// The file exceeds the accepted upload size.
    #[error("Document '{path}' is {size} bytes; the limit is {limit} bytes")]
    DocumentTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Reading the file failed after it was found.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InfopageError {
    /// Whether a fresh attempt of the same request could plausibly succeed.
    ///
    /// Connection failures, timeouts, rate limiting (429) and server-side
    /// errors (5xx) are transient. Everything else is a property of the
    /// request or the model's answer and will fail again.
    pub fn is_transient(&self) -> bool {
        match self {
            InfopageError::Transport { .. } | InfopageError::Timeout { .. } => true,
            InfopageError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            InfopageError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_display_is_the_message() {
        let e = InfopageError::Remote {
            status: 401,
            message: "No auth credentials found".into(),
        };
        assert_eq!(e.to_string(), "No auth credentials found");
        assert_eq!(e.status(), Some(401));
    }

    #[test]
    fn missing_credential_names_env_var() {
        let e = InfopageError::MissingCredential {
            env_var: "OPENROUTER_API_KEY".into(),
        };
        assert!(e.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn transient_classification() {
        assert!(InfopageError::Timeout { secs: 5 }.is_transient());
        assert!(InfopageError::Transport {
            detail: "reset".into()
        }
        .is_transient());
        assert!(InfopageError::Remote {
            status: 503,
            message: "overloaded".into()
        }
        .is_transient());
        assert!(InfopageError::Remote {
            status: 429,
            message: "slow down".into()
        }
        .is_transient());
        assert!(!InfopageError::Remote {
            status: 400,
            message: "bad request".into()
        }
        .is_transient());
        assert!(!InfopageError::EmptyResponse.is_transient());
    }

    #[test]
    fn malformed_display_has_detail_not_raw() {
        let e = InfopageError::MalformedResponse {
            raw: "not json".into(),
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(e.to_string().contains("line 1"));
    }
}
