//! Extraction and section-revision clients.
//!
//! [`InfographicClient`] is the public entry point. Each operation is one
//! request to the model endpoint and ends in exactly one of two states:
//!
//! ```text
//! Idle ──▶ Sending ──▶ Succeeded(value)
//!                  └─▶ Failed(InfopageError)
//! ```
//!
//! Preconditions (credential present, section key known) are checked before
//! the request is built, so a failed precondition never reaches the
//! transport. The client holds no mutable state; clones share the same
//! config and transport, and concurrent calls do not interact.

use crate::config::ClientConfig;
use crate::error::InfopageError;
use crate::infographic::{InfographicResult, SectionValue};
use crate::pipeline::input::{load_document, DocumentKind};
use crate::pipeline::{encode, llm, parse, request};
use crate::prompts::{section_prompt, Intent};
use crate::schema::SectionKey;
use crate::transport::{ChatTransport, HttpTransport};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Client for the hosted model endpoint.
///
/// # Example
/// ```rust,no_run
/// use infopage::{ClientConfig, DocumentKind, InfographicClient, Intent};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = InfographicClient::new(ClientConfig::from_env()?)?;
/// let bytes = std::fs::read("brochure.pdf")?;
/// let result = client
///     .extract(&bytes, DocumentKind::Pdf, None, Intent::Selling)
///     .await?;
/// println!("{}: {}", result.title, result.tagline);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InfographicClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn ChatTransport>,
}

impl std::fmt::Debug for InfographicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfographicClient")
            .field("config", &self.config)
            .field("transport", &"<dyn ChatTransport>")
            .finish()
    }
}

impl InfographicClient {
    /// Client over HTTPS; each call is bounded by the config's timeout.
    pub fn new(config: ClientConfig) -> Result<Self, InfopageError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn a document into a full infographic.
    ///
    /// `model` overrides the configured default for this call only.
    ///
    /// # Errors
    /// - [`InfopageError::MissingCredential`] before any request when no key is set
    /// - [`InfopageError::Remote`] for a non-success HTTP status
    /// - [`InfopageError::EmptyResponse`] when the model returned no content
    /// - [`InfopageError::MalformedResponse`] when the content is not JSON
    /// - [`InfopageError::SchemaMismatch`] when the JSON has the wrong shape
    /// - [`InfopageError::Transport`] / [`InfopageError::Timeout`] when no reply arrived
    pub async fn extract(
        &self,
        document: &[u8],
        kind: DocumentKind,
        model: Option<&str>,
        intent: Intent,
    ) -> Result<InfographicResult, InfopageError> {
        let api_key = self.config.require_api_key()?;
        let model = model.unwrap_or(&self.config.model);
        let start = Instant::now();
        info!(
            "Extracting {} document ({} bytes) with {} as {}",
            kind.mime_type(),
            document.len(),
            model,
            intent
        );

        let data_uri = encode::encode_document(document, kind);
        let prompt = self.config.extraction_prompt(intent);
        let body = request::extraction_request(model, prompt, data_uri);

        let content = llm::complete(self.transport.as_ref(), &self.config, api_key, &body).await?;
        debug!("Model returned {} chars of content", content.len());

        let value = parse::parse_json(&content)?;
        let result = parse::decode_infographic(value, &content)?;

        for note in result.advisories() {
            warn!("Infographic advisory: {}", note);
        }
        info!(
            "Extraction complete: '{}' in {}ms",
            result.title,
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Read a PDF or text file from disk and extract it.
    pub async fn extract_file(
        &self,
        path: impl AsRef<Path>,
        model: Option<&str>,
        intent: Intent,
    ) -> Result<InfographicResult, InfopageError> {
        // Check the credential before touching the file system.
        self.config.require_api_key()?;
        let doc = load_document(path).await?;
        self.extract(&doc.bytes, doc.kind, model, intent).await
    }

    /// Regenerate one section from its current value and an instruction.
    ///
    /// Returns the replacement value only; apply it with
    /// [`InfographicResult::apply_section`] or use
    /// [`InfographicClient::revise_in_place`].
    pub async fn revise_section(
        &self,
        key: SectionKey,
        current: &Value,
        instruction: &str,
        model: Option<&str>,
    ) -> Result<SectionValue, InfopageError> {
        let api_key = self.config.require_api_key()?;
        let model = model.unwrap_or(&self.config.model);
        let start = Instant::now();
        info!("Revising section '{}' with {}", key, model);

        let prompt = section_prompt(key, current, instruction);
        let body = request::revision_request(model, prompt);

        let content = llm::complete(self.transport.as_ref(), &self.config, api_key, &body).await?;
        let value = parse::parse_json(&content)?;
        let revised = parse::decode_section(key, value, &content)?;

        info!(
            "Section '{}' revised in {}ms",
            key,
            start.elapsed().as_millis()
        );
        Ok(revised)
    }

    /// [`InfographicClient::revise_section`] with the section named by its JSON key.
    ///
    /// Unknown names fail with [`InfopageError::SchemaNotFound`] before any
    /// request is made.
    pub async fn revise_section_by_name(
        &self,
        key: &str,
        current: &Value,
        instruction: &str,
        model: Option<&str>,
    ) -> Result<SectionValue, InfopageError> {
        let key: SectionKey = key.parse()?;
        self.revise_section(key, current, instruction, model).await
    }

    /// Revise one section of `result` and replace it wholesale.
    ///
    /// On failure `result` is left untouched. Returns the replaced value.
    pub async fn revise_in_place(
        &self,
        result: &mut InfographicResult,
        key: SectionKey,
        instruction: &str,
        model: Option<&str>,
    ) -> Result<SectionValue, InfopageError> {
        let current = result.section(key).to_json();
        let revised = self.revise_section(key, &current, instruction, model).await?;
        Ok(result.apply_section(revised))
    }
}
