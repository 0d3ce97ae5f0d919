use std::time::Duration;

use async_trait::async_trait;

use cvjson_core::document::{Document, ExtractedText};
use cvjson_core::error::{CvJsonError, Result};
use cvjson_core::extraction::TextExtractor;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Text extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self {
            timeout: EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[tracing::instrument(
        skip(self, document),
        fields(filename = %document.filename(), bytes = document.len())
    )]
    async fn extract_text(&self, document: &Document) -> Result<ExtractedText> {
        document.ensure_supported()?;

        let bytes = document.bytes().to_vec();
        // pdf-extract is synchronous and may panic on malformed input; the
        // blocking task turns a panic into a JoinError.
        let raw = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)),
        )
        .await
        .map_err(|_| CvJsonError::TextExtractionFailed("PDF extraction timed out".into()))?
        .map_err(|e| CvJsonError::TextExtractionFailed(format!("PDF extraction task failed: {e}")))?
        .map_err(|e| CvJsonError::TextExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let text = normalize_text(&raw);
        if text.is_empty() {
            return Err(CvJsonError::TextExtractionFailed(format!(
                "no text found in '{}'",
                document.filename()
            )));
        }

        tracing::info!(chars = text.len(), "PDF text extraction complete");
        Ok(ExtractedText::new(text))
    }
}

/// Drops control characters, trims line ends and collapses runs of blank lines.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;

    for line in raw.lines() {
        let line: String = line
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        let line = line.trim_end();

        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(line);
        blank_run = 0;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_blank_lines() {
        let raw = "\n\nJane Doe   \n\n\n\nSoftware Engineer\r\nRust\n\n";
        assert_eq!(normalize_text(raw), "Jane Doe\n\nSoftware Engineer\nRust");
    }

    #[test]
    fn normalize_strips_control_characters() {
        let raw = "Jane\u{0}Doe\u{c}\n\tIndented";
        assert_eq!(normalize_text(raw), "JaneDoe\n\tIndented");
    }

    #[test]
    fn normalize_blank_input_is_empty() {
        assert_eq!(normalize_text(" \n\u{0}\n\t\n"), "");
    }

    #[tokio::test]
    async fn rejects_non_pdf_documents() {
        let extractor = PdfTextExtractor::new();
        let document = Document::new(b"hello".to_vec(), "text/plain", "cv.txt");
        let err = extractor.extract_text(&document).await.unwrap_err();
        assert!(matches!(err, CvJsonError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn corrupt_bytes_fail_extraction() {
        let extractor = PdfTextExtractor::new();
        let document = Document::new(b"not a pdf at all".to_vec(), "application/pdf", "cv.pdf");
        let err = extractor.extract_text(&document).await.unwrap_err();
        assert!(matches!(err, CvJsonError::TextExtractionFailed(_)));
    }
}
