//! Pipeline stages for document-to-infographic extraction.
//!
//! Each submodule implements one step; [`crate::client`] runs them in order.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ request ──▶ llm ──▶ parse
//! (file)    (data URI)  (JSON body)  (HTTP)  (JSON → typed)
//! ```
//!
//! 1. [`input`]    read a document from disk and classify it as PDF or text
//! 2. [`encode`]   wrap the bytes in a `data:<mime>;base64,` URI
//! 3. [`request`]  build the OpenAI-compatible chat request body
//! 4. [`llm`]      send it through a transport, classify the HTTP reply,
//!    and return the message content; the only stage with network I/O
//! 5. [`parse`]    JSON-parse the content and decode it into the schema types

pub mod encode;
pub mod input;
pub mod llm;
pub mod parse;
pub mod request;
