pub mod invoker;
pub mod pdf;
pub mod pipeline;
pub mod retry;
pub mod tokens;
pub mod validator;

pub use invoker::OpenAiInvoker;
pub use pdf::{normalize_text, PdfTextExtractor};
pub use pipeline::LlmExtractionPipeline;
pub use retry::RetryingInvoker;
pub use tokens::TokenCounter;
