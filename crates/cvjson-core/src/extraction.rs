use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::document::{Document, ExtractedText};
use crate::error::Result;
use crate::prompt::{ModelReply, PromptRequest};
use crate::record::StructuredRecord;
use crate::template::TemplateId;

/// Point in time after which a caller no longer wants the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Time left, or `None` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }
}

/// Turns document bytes into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, document: &Document) -> Result<ExtractedText>;
}

/// One request/response round trip to the LLM.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: &PromptRequest, deadline: Option<Deadline>)
        -> Result<ModelReply>;
}

#[async_trait]
pub trait ExtractionPipeline: Send + Sync {
    /// Full pipeline: media-type check, text extraction, prompt, model, validation.
    async fn extract(
        &self,
        document: &Document,
        template: TemplateId,
        deadline: Option<Deadline>,
    ) -> Result<StructuredRecord>;

    /// Runs the pipeline from already-extracted text.
    async fn generate(
        &self,
        text: &ExtractedText,
        template: TemplateId,
        deadline: Option<Deadline>,
    ) -> Result<StructuredRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_reports_remaining_time() {
        let deadline = Deadline::after(Duration::from_secs(60));
        let remaining = deadline.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(50));
        assert!(!deadline.is_expired());
    }

    #[tokio::test]
    async fn past_deadline_is_expired() {
        let deadline = Deadline::at(Instant::now() - Duration::from_millis(5));
        assert_eq!(deadline.remaining(), None);
        assert!(deadline.is_expired());
    }
}
