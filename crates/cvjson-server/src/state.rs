use std::sync::Arc;

use cvjson_core::{AppConfig, Deadline, ExtractionPipeline, TextExtractor};
use cvjson_extraction::TokenCounter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<dyn ExtractionPipeline>,
    pub text_extractor: Arc<dyn TextExtractor>,
    pub tokens: Arc<TokenCounter>,
}

impl AppState {
    /// Deadline for one request, measured from now.
    pub fn deadline(&self) -> Deadline {
        Deadline::after(std::time::Duration::from_secs(
            self.config.request_timeout_secs,
        ))
    }
}
