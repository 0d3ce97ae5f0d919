use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use cvjson_core::config::AppConfig;
use cvjson_core::document::{Document, ExtractedText};
use cvjson_core::error::{CvJsonError, Result};
use cvjson_core::extraction::{Deadline, ExtractionPipeline, ModelInvoker, TextExtractor};
use cvjson_core::prompt::PromptRequest;
use cvjson_core::record::{StructuredRecord, ValidationMode};
use cvjson_core::template::{self, SchemaSpec, TemplateId};

use crate::tokens::TokenCounter;
use crate::validator;

/// LLM-backed résumé extraction pipeline.
///
/// One attempt per call, fail-fast: the first failing stage ends the request
/// and no partial record is returned.
pub struct LlmExtractionPipeline {
    extractor: Arc<dyn TextExtractor>,
    invoker: Arc<dyn ModelInvoker>,
    tokens: Arc<TokenCounter>,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    validation_mode: ValidationMode,
    token_warning_threshold: usize,
}

impl LlmExtractionPipeline {
    pub fn new(
        config: &AppConfig,
        extractor: Arc<dyn TextExtractor>,
        invoker: Arc<dyn ModelInvoker>,
    ) -> Self {
        Self {
            extractor,
            invoker,
            tokens: Arc::new(TokenCounter::new()),
            model: config.extraction_model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            validation_mode: config.validation_mode,
            token_warning_threshold: config.token_warning_threshold,
        }
    }

    pub fn with_token_counter(mut self, tokens: Arc<TokenCounter>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn token_counter(&self) -> &Arc<TokenCounter> {
        &self.tokens
    }

    pub fn build_prompt(&self, text: &ExtractedText, schema: &SchemaSpec) -> PromptRequest {
        PromptRequest::new(
            schema.instructions,
            text,
            self.model.as_str(),
            self.temperature,
            self.max_output_tokens,
        )
    }

    /// Logs the prompt size and returns it. Never fails: an unknown model
    /// only produces a warning.
    ///
    /// Encoding runs on the blocking pool; the first use of a model loads its
    /// BPE table.
    async fn observe_tokens(
        &self,
        extraction_id: Uuid,
        request: &PromptRequest,
    ) -> Option<usize> {
        let tokens = Arc::clone(&self.tokens);
        let model = self.model.clone();
        let system = request.system().to_owned();
        let user = request.user().to_owned();

        let counted = tokio::task::spawn_blocking(move || -> Result<usize> {
            Ok(tokens.count(&system, &model)? + tokens.count(&user, &model)?)
        })
        .await;

        match counted {
            Ok(Ok(prompt_tokens)) => {
                tracing::info!(
                    %extraction_id,
                    model = %self.model,
                    prompt_tokens,
                    "Counted prompt tokens"
                );
                if prompt_tokens > self.token_warning_threshold {
                    tracing::warn!(
                        %extraction_id,
                        prompt_tokens,
                        threshold = self.token_warning_threshold,
                        "Prompt exceeds the token warning threshold"
                    );
                }
                Some(prompt_tokens)
            }
            Ok(Err(e)) => {
                tracing::warn!(%extraction_id, error = %e, "Token counting failed, continuing");
                None
            }
            Err(e) => {
                tracing::warn!(%extraction_id, error = %e, "Token counting task failed");
                None
            }
        }
    }

    async fn run(
        &self,
        extraction_id: Uuid,
        text: &ExtractedText,
        template_id: TemplateId,
        deadline: Option<Deadline>,
    ) -> Result<StructuredRecord> {
        let schema = template::resolve(template_id);
        let request = self.build_prompt(text, schema);
        self.observe_tokens(extraction_id, &request).await;

        tracing::debug!(
            %extraction_id,
            template = %schema.id,
            requested = %template_id,
            "Resolved extraction template"
        );

        let reply = within(deadline, self.invoker.invoke(&request, deadline), || {
            CvJsonError::invocation("deadline exceeded during model call")
        })
        .await
        .map_err(into_invocation_failure)
        .inspect_err(|e| tracing::error!(%extraction_id, error = %e, "Model invocation failed"))?;

        let record = validator::validate(reply.as_str(), schema, self.validation_mode)
            .inspect_err(|e| {
                tracing::error!(
                    %extraction_id,
                    kind = ?e.kind(),
                    reply_len = reply.as_str().len(),
                    error = %e,
                    "Model reply failed validation"
                )
            })?;

        tracing::info!(
            %extraction_id,
            keys = record.as_map().len(),
            "Extraction complete"
        );
        Ok(record)
    }
}

#[async_trait]
impl ExtractionPipeline for LlmExtractionPipeline {
    async fn extract(
        &self,
        document: &Document,
        template_id: TemplateId,
        deadline: Option<Deadline>,
    ) -> Result<StructuredRecord> {
        let extraction_id = Uuid::new_v4();
        tracing::info!(
            %extraction_id,
            filename = %document.filename(),
            media_type = %document.media_type(),
            bytes = document.len(),
            template = %template_id,
            "Starting extraction for document"
        );

        document
            .ensure_supported()
            .inspect_err(|e| tracing::warn!(%extraction_id, error = %e, "Rejected upload"))?;

        let text = within(deadline, self.extractor.extract_text(document), || {
            CvJsonError::TextExtractionFailed("deadline exceeded during text extraction".into())
        })
        .await
        .map_err(into_extraction_failure)
        .inspect_err(|e| tracing::error!(%extraction_id, error = %e, "Text extraction failed"))?;

        self.run(extraction_id, &text, template_id, deadline).await
    }

    async fn generate(
        &self,
        text: &ExtractedText,
        template_id: TemplateId,
        deadline: Option<Deadline>,
    ) -> Result<StructuredRecord> {
        let extraction_id = Uuid::new_v4();
        tracing::info!(
            %extraction_id,
            chars = text.len(),
            template = %template_id,
            "Starting extraction for text"
        );
        self.run(extraction_id, text, template_id, deadline).await
    }
}

async fn within<T, F, E>(deadline: Option<Deadline>, fut: F, on_timeout: E) -> Result<T>
where
    F: Future<Output = Result<T>>,
    E: FnOnce() -> CvJsonError,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline.instant(), fut)
            .await
            .unwrap_or_else(|_| Err(on_timeout())),
        None => fut.await,
    }
}

fn into_extraction_failure(err: CvJsonError) -> CvJsonError {
    match err {
        err @ CvJsonError::TextExtractionFailed(_) => err,
        other => CvJsonError::TextExtractionFailed(other.to_string()),
    }
}

fn into_invocation_failure(err: CvJsonError) -> CvJsonError {
    match err {
        err @ CvJsonError::ModelInvocationFailed { .. } => err,
        other => CvJsonError::invocation(other.to_string()),
    }
}
