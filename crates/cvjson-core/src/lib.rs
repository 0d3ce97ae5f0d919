pub mod api_types;
pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod prompt;
pub mod record;
pub mod template;

pub use config::AppConfig;
pub use document::{Document, ExtractedText, PDF_MEDIA_TYPE};
pub use error::{CvJsonError, ErrorKind, Result};
pub use extraction::{Deadline, ExtractionPipeline, ModelInvoker, TextExtractor};
pub use prompt::{ModelReply, PromptRequest};
pub use record::{StructuredRecord, ValidationMode};
pub use template::{SchemaSpec, TemplateId};
