use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CvJsonError, Result};

/// The only media type the pipeline accepts.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// An uploaded document. Consumed once by the text extractor, never persisted.
#[derive(Clone)]
pub struct Document {
    bytes: Vec<u8>,
    media_type: String,
    filename: String,
}

impl Document {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into().trim().to_lowercase(),
            filename: filename.into(),
        }
    }

    /// Parses the `data:<media-type>[;param]*;base64,<payload>` form that browsers
    /// produce for file uploads. Non-PDF media types are rejected before the
    /// payload is looked at.
    pub fn from_data_url(data_url: &str, filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CvJsonError::UnsupportedMediaType("upload is not a data URL".into()))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            CvJsonError::UnsupportedMediaType("data URL has no payload separator".into())
        })?;

        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default().trim();
        if media_type.is_empty() {
            return Err(CvJsonError::UnsupportedMediaType(
                "data URL declares no media type".into(),
            ));
        }
        let media_type = media_type.to_lowercase();
        if media_type != PDF_MEDIA_TYPE {
            return Err(CvJsonError::UnsupportedMediaType(format!(
                "'{filename}' has media type '{media_type}', expected '{PDF_MEDIA_TYPE}'"
            )));
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(CvJsonError::TextExtractionFailed(
                "data URL payload is not base64-encoded".into(),
            ));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| CvJsonError::TextExtractionFailed(format!("invalid base64 payload: {e}")))?;

        Ok(Self::new(bytes, media_type, filename))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    /// Fails with `UnsupportedMediaType` unless the declared type is PDF.
    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_pdf() {
            Ok(())
        } else {
            Err(CvJsonError::UnsupportedMediaType(format!(
                "'{}' has media type '{}', expected '{PDF_MEDIA_TYPE}'",
                self.filename, self.media_type
            )))
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Plain text recovered from a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for ExtractedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ExtractedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
