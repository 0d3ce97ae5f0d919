use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CvJsonError, ErrorKind};
use crate::template::TemplateId;

// --- Health ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub api_key_configured: bool,
}

// --- Text extraction ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessPdfRequest {
    /// Browser data URL: `data:application/pdf;base64,...`
    #[serde(rename = "fileContent")]
    pub file_content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessPdfResponse {
    pub text: String,
}

// --- JSON generation ---

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateJsonRequest {
    pub text: String,
    #[serde(default, deserialize_with = "lenient_template")]
    pub template: TemplateId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(rename = "fileContent")]
    pub file_content: String,
    #[serde(rename = "fileName", default = "default_file_name")]
    pub file_name: String,
    #[serde(default, deserialize_with = "lenient_template")]
    pub template: TemplateId,
}

/// Any `template` value that is not a known id string selects the default.
fn lenient_template<'de, D>(deserializer: D) -> std::result::Result<TemplateId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => TemplateId::parse(&id),
        _ => TemplateId::Default,
    })
}

fn default_file_name() -> String {
    "upload.pdf".to_string()
}

// --- Tokens ---

#[derive(Debug, Serialize, Deserialize)]
pub struct CountTokensRequest {
    pub text: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountTokensResponse {
    pub model: String,
    pub tokens: usize,
}

// --- Templates ---

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }
}

impl From<&CvJsonError> for ErrorResponse {
    fn from(err: &CvJsonError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}
