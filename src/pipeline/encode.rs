//! Document encoding: raw bytes → base64 data URI.
//!
//! OpenRouter accepts files inline as `data:<mime>;base64,<payload>` inside
//! an `image_url` content part; PDF and plain text are both sent this way.

use crate::pipeline::input::DocumentKind;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Encode a document as a data URI for the chat request.
pub fn encode_document(bytes: &[u8], kind: DocumentKind) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!(
        "Encoded {} document: {} bytes → {} bytes base64",
        kind.mime_type(),
        bytes.len(),
        b64.len()
    );
    format!("data:{};base64,{}", kind.mime_type(), b64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_text_document() {
        let uri = encode_document(b"hello", DocumentKind::PlainText);
        assert_eq!(uri, "data:text/plain;base64,aGVsbG8=");
    }

    #[test]
    fn encode_pdf_round_trips() {
        let bytes = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n";
        let uri = encode_document(bytes, DocumentKind::Pdf);
        let payload = uri
            .strip_prefix("data:application/pdf;base64,")
            .expect("pdf prefix");
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }

    #[test]
    fn encode_empty_document() {
        assert_eq!(
            encode_document(b"", DocumentKind::PlainText),
            "data:text/plain;base64,"
        );
    }
}
