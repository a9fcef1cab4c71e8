//! Input loading: read a document from disk and decide what it is.
//!
//! Only PDF and plain text are accepted. The kind is taken from the `%PDF`
//! magic bytes first and the file extension second, so a PDF saved without
//! an extension still goes out as `application/pdf`.

use crate::error::InfopageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest document accepted for upload (10 MiB).
///
/// The base64 payload is a third larger again, and hosted models reject
/// requests far below what memory would allow.
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// The document formats the extraction endpoint is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "text/plain")]
    PlainText,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain",
        }
    }

    /// Parse a MIME type; parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "text/plain" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Classify from leading bytes and the file name.
    pub fn detect(path: &Path, head: &[u8]) -> Option<Self> {
        if head.starts_with(b"%PDF") {
            return Some(DocumentKind::Pdf);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt") => Some(DocumentKind::PlainText),
            // A .pdf without the magic header is not something we can send as a PDF.
            _ => None,
        }
    }
}

/// A document read into memory and classified.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

/// Read `path`, enforce the size limit, and detect the document kind.
pub async fn load_document(path: impl AsRef<Path>) -> Result<LoadedDocument, InfopageError> {
    let path = path.as_ref().to_path_buf();

    let meta = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) => return Err(map_io_error(path, e)),
    };
    if !meta.is_file() {
        return Err(InfopageError::UnsupportedDocument { path });
    }
    if meta.len() > MAX_DOCUMENT_BYTES {
        return Err(InfopageError::DocumentTooLarge {
            path,
            size: meta.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) => return Err(map_io_error(path, e)),
    };

    let kind = match DocumentKind::detect(&path, &bytes[..bytes.len().min(4)]) {
        Some(k) => k,
        None => return Err(InfopageError::UnsupportedDocument { path }),
    };

    debug!(
        "Loaded {} ({}, {} bytes)",
        path.display(),
        kind.mime_type(),
        bytes.len()
    );
    Ok(LoadedDocument { path, kind, bytes })
}

fn map_io_error(path: PathBuf, e: std::io::Error) -> InfopageError {
    match e.kind() {
        std::io::ErrorKind::NotFound => InfopageError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => InfopageError::PermissionDenied { path },
        _ => InfopageError::ReadFailed { path, source: e },
    }
}
