use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvJsonError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Text extraction failed: {0}")]
    TextExtractionFailed(String),

    #[error("No known tokenizer for model '{0}'")]
    UnsupportedModel(String),

    #[error("Model invocation failed{}: {message}", status_suffix(.status))]
    ModelInvocationFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Model output is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Model output has unexpected shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl CvJsonError {
    /// Provider failure without an HTTP status (transport error, empty reply, deadline).
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::ModelInvocationFailed {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            Self::TextExtractionFailed(_) => ErrorKind::TextExtractionFailed,
            Self::UnsupportedModel(_) => ErrorKind::UnsupportedModel,
            Self::ModelInvocationFailed { .. } => ErrorKind::ModelInvocationFailed,
            Self::MalformedJson(_) => ErrorKind::MalformedJson,
            Self::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Stage-level failure tag, stable across releases and safe to put on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedMediaType,
    TextExtractionFailed,
    UnsupportedModel,
    ModelInvocationFailed,
    MalformedJson,
    UnexpectedShape,
    Config,
}

pub type Result<T> = std::result::Result<T, CvJsonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_display_includes_status_when_present() {
        let e = CvJsonError::ModelInvocationFailed {
            status: Some(429),
            message: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("status 429"), "got: {msg}");
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn invocation_display_without_status() {
        let msg = CvJsonError::invocation("connection reset").to_string();
        assert_eq!(msg, "Model invocation failed: connection reset");
    }

    #[test]
    fn kinds_serialize_snake_case() {
        let kind = CvJsonError::MalformedJson("eof".into()).kind();
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"malformed_json\"");
        assert_eq!(
            CvJsonError::UnexpectedShape("array".into()).kind(),
            ErrorKind::UnexpectedShape
        );
    }
}
