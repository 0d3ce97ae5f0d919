//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cvjson_core::{
    AppConfig, CvJsonError, Deadline, Document, ExtractedText, ModelInvoker, ModelReply,
    PromptRequest, Result, TextExtractor,
};
use cvjson_extraction::{LlmExtractionPipeline, TokenCounter};
use cvjson_server::AppState;

pub const JANE_DOE_TEXT: &str = "Jane Doe, Software Engineer";

pub const JANE_DOE_RECORD: &str = r#"{"employee":{"name":"Jane Doe","position":"Software Engineer","email":"-","phone":"-","image":"-","biodata":{"profile":"-","objective":"-","placeOfBirth":"-","dateOfBirth":"-","gender":"-"}},"histories":{"employment":[],"certification":[],"education":[],"project":[]}}"#;

/// Returns the same text for every document and counts calls.
pub struct FixedExtractor {
    text: &'static str,
    calls: AtomicUsize,
}

impl FixedExtractor {
    pub fn new(text: &'static str) -> Self {
        Self {
            text,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for FixedExtractor {
    async fn extract_text(&self, _document: &Document) -> Result<ExtractedText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExtractedText::from(self.text))
    }
}

pub enum Reply {
    Text(&'static str),
    ProviderError(u16, &'static str),
}

/// Answers every call with one scripted reply and records the prompts it saw.
pub struct RecordingInvoker {
    reply: Reply,
    requests: Mutex<Vec<PromptRequest>>,
}

impl RecordingInvoker {
    pub fn replying(text: &'static str) -> Self {
        Self::new(Reply::Text(text))
    }

    pub fn failing(status: u16, message: &'static str) -> Self {
        Self::new(Reply::ProviderError(status, message))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> PromptRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("invoker was never called")
    }
}

#[async_trait]
impl ModelInvoker for RecordingInvoker {
    async fn invoke(
        &self,
        request: &PromptRequest,
        _deadline: Option<Deadline>,
    ) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(request.clone());
        match self.reply {
            Reply::Text(text) => Ok(ModelReply::new(text)),
            Reply::ProviderError(status, message) => Err(CvJsonError::ModelInvocationFailed {
                status: Some(status),
                message: message.to_string(),
            }),
        }
    }
}

pub fn pipeline(
    extractor: Arc<FixedExtractor>,
    invoker: Arc<RecordingInvoker>,
) -> LlmExtractionPipeline {
    LlmExtractionPipeline::new(&AppConfig::default(), extractor, invoker)
}

pub fn app_state(extractor: Arc<FixedExtractor>, invoker: Arc<RecordingInvoker>) -> AppState {
    let config = AppConfig {
        openai_api_key: "sk-test".into(),
        ..AppConfig::default()
    };
    app_state_with_config(config, extractor, invoker)
}

pub fn app_state_with_config(
    config: AppConfig,
    extractor: Arc<FixedExtractor>,
    invoker: Arc<RecordingInvoker>,
) -> AppState {
    let tokens = Arc::new(TokenCounter::new());
    let pipeline = LlmExtractionPipeline::new(&config, extractor.clone(), invoker)
        .with_token_counter(tokens.clone());

    AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
        text_extractor: extractor,
        tokens,
    }
}

pub fn pdf_data_url(bytes: &[u8]) -> String {
    use base64::Engine;
    format!(
        "data:application/pdf;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
