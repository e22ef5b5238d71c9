// PDF text extraction. The backend yields per-page text; callers always get the
// pages concatenated in document order.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SourceError};

/// How far into the file the `%PDF-` header may appear.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Low-level PDF text extraction.
pub trait PdfTextExtractor: Send + Sync {
    /// Text of each page, in page order. Errors carry a human-readable reason.
    fn page_texts(&self, pdf: &[u8]) -> std::result::Result<Vec<String>, String>;
}

/// `pdf-extract` backed extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl PdfTextExtractor for PdfExtractBackend {
    fn page_texts(&self, pdf: &[u8]) -> std::result::Result<Vec<String>, String> {
        pdf_extract::extract_text_from_mem_by_pages(pdf).map_err(|e| e.to_string())
    }
}

/// Whether the bytes carry a PDF header.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Extract the full text of a PDF on the blocking pool.
///
/// Rejects non-PDF bytes up front, turns parser failures and parser panics into
/// [`SourceError::InvalidPdf`], and refuses documents with no text at all
/// (typically scanned images).
pub(crate) async fn extract_text(
    extractor: Arc<dyn PdfTextExtractor>,
    pdf: Vec<u8>,
    locator: &str,
) -> Result<String> {
    if !looks_like_pdf(&pdf) {
        return Err(SourceError::NotPdf(locator.to_string()));
    }

    let pages = tokio::task::spawn_blocking(move || extractor.page_texts(&pdf))
        .await
        .map_err(|e| SourceError::InvalidPdf {
            locator: locator.to_string(),
            reason: format!("PDF parser aborted: {e}"),
        })?
        .map_err(|reason| SourceError::InvalidPdf {
            locator: locator.to_string(),
            reason,
        })?;

    debug!(locator, pages = pages.len(), "pdf: extracted pages");

    let text = pages.concat();
    if text.trim().is_empty() {
        return Err(SourceError::NoExtractableText(locator.to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl PdfTextExtractor for FixedPages {
        fn page_texts(&self, _pdf: &[u8]) -> std::result::Result<Vec<String>, String> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    struct Panics;

    impl PdfTextExtractor for Panics {
        fn page_texts(&self, _pdf: &[u8]) -> std::result::Result<Vec<String>, String> {
            panic!("unsupported font encoding")
        }
    }

    fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.5\n...".to_vec()
    }

    #[test]
    fn detects_pdf_header() {
        assert!(looks_like_pdf(b"%PDF-1.7\n%\xe2\xe3"));
        assert!(looks_like_pdf(b"\r\n%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04 not a pdf"));
        assert!(!looks_like_pdf(b""));
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let extractor = Arc::new(FixedPages(vec!["Page one. ", "Page two. ", "Page three."]));
        let text = extract_text(extractor, pdf_bytes(), "paper.pdf").await.unwrap();
        assert_eq!(text, "Page one. Page two. Page three.");
    }

    #[tokio::test]
    async fn rejects_non_pdf_bytes() {
        let extractor = Arc::new(FixedPages(vec!["unused"]));
        let err = extract_text(extractor, b"hello".to_vec(), "notes.txt").await.unwrap_err();
        assert!(matches!(err, SourceError::NotPdf(ref name) if name == "notes.txt"));
    }

    #[tokio::test]
    async fn whitespace_only_text_is_no_extractable_text() {
        let extractor = Arc::new(FixedPages(vec!["\n", "  \x0c"]));
        let err = extract_text(extractor, pdf_bytes(), "scan.pdf").await.unwrap_err();
        assert!(matches!(err, SourceError::NoExtractableText(_)));
    }

    #[tokio::test]
    async fn parser_panic_becomes_invalid_pdf() {
        let err = extract_text(Arc::new(Panics), pdf_bytes(), "odd.pdf").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidPdf { ref locator, .. } if locator == "odd.pdf"));
    }

    #[tokio::test]
    async fn real_backend_rejects_truncated_pdf() {
        let err = extract_text(Arc::new(PdfExtractBackend), pdf_bytes(), "broken.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidPdf { .. }));
    }
}
