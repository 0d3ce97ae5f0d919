use serde::{Deserialize, Serialize};

use crate::error::{CvJsonError, Result};
use crate::record::ValidationMode;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Data URL header, JSON keys and file name around an upload's payload.
const REQUEST_ENVELOPE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub extraction_model: String,
    /// Sampling temperature for extraction requests. Not read from the environment.
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub validation_mode: ValidationMode,
    /// Prompt size (in tokens) above which the pipeline logs a warning.
    pub token_warning_threshold: usize,
    pub request_timeout_secs: u64,
    pub model_retries: u32,
    pub max_upload_bytes: usize,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            extraction_model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
            validation_mode: ValidationMode::Lenient,
            token_warning_threshold: 100_000,
            request_timeout_secs: 120,
            model_retries: 0,
            max_upload_bytes: 10 * 1024 * 1024,
            server_host: "0.0.0.0".into(),
            server_port: 8080,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            extraction_model: lookup("EXTRACTION_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.extraction_model),
            temperature: defaults.temperature,
            max_output_tokens: parse_var(&lookup, "EXTRACTION_MAX_TOKENS"),
            validation_mode: lookup("EXTRACTION_VALIDATION")
                .map(|v| ValidationMode::from_name(&v))
                .unwrap_or(defaults.validation_mode),
            token_warning_threshold: parse_var(&lookup, "EXTRACTION_TOKEN_WARNING")
                .unwrap_or(defaults.token_warning_threshold),
            request_timeout_secs: parse_var(&lookup, "EXTRACTION_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            model_retries: parse_var(&lookup, "EXTRACTION_MODEL_RETRIES")
                .unwrap_or(defaults.model_retries),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// HTTP body limit for upload endpoints. Uploads arrive as base64 data URLs
    /// inside JSON, so the raw file limit grows by 4/3 plus room for the
    /// envelope.
    pub fn request_body_limit(&self) -> usize {
        self.max_upload_bytes
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(REQUEST_ENVELOPE_BYTES)
    }

    /// Checks the settings the model invoker depends on.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(CvJsonError::Config("OPENAI_API_KEY is not set".into()));
        }
        url::Url::parse(&self.openai_base_url).map_err(|e| {
            CvJsonError::Config(format!(
                "OPENAI_BASE_URL '{}' is not a valid URL: {e}",
                self.openai_base_url
            ))
        })?;
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
