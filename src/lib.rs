//! # infopage
//!
//! Turn a PDF or plain-text document into the structured content of a
//! one-page infographic using a hosted large language model.
//!
//! The model does the reading. This crate owns the contract around it: the
//! JSON schema the model must fill, the prompts that ask for it, one
//! chat-completion request per operation, and strict parsing of the answer
//! into typed Rust values.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Input    read PDF/TXT from disk, detect kind, enforce size limit
//!  ├─ 2. Encode   bytes → data:<mime>;base64,… URI
//!  ├─ 3. Prompt   intent template + full schema (or section prompt)
//!  ├─ 4. Request  one POST to /chat/completions in JSON mode
//!  └─ 5. Parse    content → JSON → InfographicResult / SectionValue
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infopage::{ClientConfig, InfographicClient, Intent, SectionKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENROUTER_API_KEY (and optionally INFOPAGE_MODEL).
//!     let client = InfographicClient::new(ClientConfig::from_env()?)?;
//!
//!     let mut page = client
//!         .extract_file("report.pdf", None, Intent::Informational)
//!         .await?;
//!     println!("{}: {}", page.title, page.tagline);
//!
//!     client
//!         .revise_in_place(&mut page, SectionKey::Quote, "make it punchier", None)
//!         .await?;
//!     println!("\"{}\" ({})", page.quote.text, page.quote.author);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `infopage` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod infographic;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::InfographicClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::InfopageError;
pub use infographic::{ChartDatum, ChartType, InfographicResult, Quote, SectionValue, Stat};
pub use pipeline::input::{load_document, DocumentKind, LoadedDocument};
pub use prompts::{extraction_prompt, section_prompt, Intent, PromptSet};
pub use schema::{full_schema, full_schema_json, section_schema, SectionKey};
pub use transport::{ChatTransport, HttpReply, HttpTransport, OutboundCall};
