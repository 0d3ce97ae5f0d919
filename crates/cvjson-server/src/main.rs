use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cvjson_core::{AppConfig, ModelInvoker};
use cvjson_extraction::{
    LlmExtractionPipeline, OpenAiInvoker, PdfTextExtractor, RetryingInvoker, TokenCounter,
};
use cvjson_server::AppState;

const RETRY_BASE_BACKOFF: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cvjson=info".parse()?))
        .init();

    let config = AppConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::warn!("{e}; JSON generation will fail until this is fixed");
    }
    let addr = format!("{}:{}", config.server_host, config.server_port);

    let invoker = OpenAiInvoker::new(&config)?;
    let invoker: Arc<dyn ModelInvoker> = if config.model_retries > 0 {
        tracing::info!(retries = config.model_retries, "Model call retries enabled");
        Arc::new(RetryingInvoker::new(
            invoker,
            config.model_retries,
            RETRY_BASE_BACKOFF,
        ))
    } else {
        Arc::new(invoker)
    };

    let text_extractor = Arc::new(PdfTextExtractor::new());
    let tokens = Arc::new(TokenCounter::new());
    let pipeline = LlmExtractionPipeline::new(&config, text_extractor.clone(), invoker)
        .with_token_counter(tokens.clone());

    tracing::info!(
        model = %pipeline.model(),
        validation = ?config.validation_mode,
        "Extraction pipeline ready"
    );

    let state = AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
        text_extractor,
        tokens,
    };

    let app = cvjson_server::app(state);

    tracing::info!("cvjson server listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
