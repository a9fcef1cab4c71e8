//! Client configuration.
//!
//! Everything a call needs from the outside world (credential, endpoint,
//! default model, prompts, timeouts) lives in one immutable
//! [`ClientConfig`], built with [`ClientConfigBuilder`] or
//! [`ClientConfig::from_env`] and handed to
//! [`crate::client::InfographicClient::new`]. Nothing is looked up from the
//! process environment at call time.

use crate::error::InfopageError;
use crate::prompts::{Intent, PromptSet};
use std::fmt;

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "INFOPAGE_MODEL";
/// Environment variable overriding the endpoint base URL.
pub const BASE_URL_ENV: &str = "OPENROUTER_BASE_URL";

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_APP_TITLE: &str = "InfoPage AI";
pub const DEFAULT_REFERER: &str = "https://github.com/infopage/infopage";

/// Configuration for [`crate::client::InfographicClient`].
///
/// # Example
/// ```rust
/// use infopage::{ClientConfig, Intent, PromptSet};
///
/// let config = ClientConfig::builder()
///     .api_key("sk-or-test")
///     .model("openai/gpt-4.1-mini")
///     .prompts(PromptSet::new().with_override(Intent::Selling, "Sell it. Return JSON."))
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "openai/gpt-4.1-mini");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer credential. `None` makes every call fail with
    /// [`InfopageError::MissingCredential`] before any request is sent.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,

    /// Model used when a call does not name one. Default: `google/gemini-2.5-flash`.
    pub model: String,

    /// Extraction prompts, with any user overrides.
    pub prompts: PromptSet,

    /// Sent as `HTTP-Referer` (OpenRouter attribution).
    pub referer: String,

    /// Sent as `X-Title` (OpenRouter attribution).
    pub app_title: String,

    /// Per-call timeout in seconds. Default: 120.
    ///
    /// Whole-document extraction on a large PDF can take a minute on slower
    /// models; 120 s leaves headroom without hanging forever.
    pub api_timeout_secs: u64,

    /// Extra attempts after a transient transport failure. Default: 0.
    ///
    /// With the default every call issues exactly one request. Only
    /// failures for which [`InfopageError::is_transient`] holds are retried.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled per attempt. Default: 500.
    pub retry_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompts: PromptSet::default(),
            referer: DEFAULT_REFERER.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            api_timeout_secs: 120,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("prompts", &self.prompts)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration from `OPENROUTER_API_KEY`, `INFOPAGE_MODEL` and
    /// `OPENROUTER_BASE_URL`. A missing key is not an error here; it
    /// surfaces when a call is made.
    pub fn from_env() -> Result<Self, InfopageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfopageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(key) = non_empty(API_KEY_ENV) {
            builder = builder.api_key(key);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            builder = builder.model(model);
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// The configured credential, or the precondition error.
    pub fn require_api_key(&self) -> Result<&str, InfopageError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| InfopageError::MissingCredential {
                env_var: API_KEY_ENV.to_string(),
            })
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// System prompt for an extraction with `intent`.
    pub fn extraction_prompt(&self, intent: Intent) -> &str {
        self.prompts.prompt_for(intent)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn prompts(mut self, prompts: PromptSet) -> Self {
        self.config.prompts = prompts;
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.config.referer = referer.into();
        self
    }

    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = title.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n.min(10);
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, InfopageError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(InfopageError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.model.trim().is_empty() {
            return Err(InfopageError::InvalidConfig("model must not be empty".into()));
        }
        if c.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(InfopageError::InvalidConfig(
                "API key must not be blank".into(),
            ));
        }
        Ok(self.config)
    }
}
