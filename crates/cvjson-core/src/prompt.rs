use serde::{Deserialize, Serialize};

use crate::document::ExtractedText;

/// Literal instruction that precedes the résumé text in the user message.
pub const USER_PROMPT_PREFIX: &str = "Convert the following CV/Resume text into JSON:";

/// A fully formed chat request. Built once per call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    system: String,
    user: String,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
}

impl PromptRequest {
    pub fn new(
        system: impl Into<String>,
        text: &ExtractedText,
        model: impl Into<String>,
        temperature: f32,
        max_output_tokens: Option<u32>,
    ) -> Self {
        Self {
            system: system.into(),
            user: user_message(text),
            model: model.into(),
            temperature,
            max_output_tokens,
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }
}

/// Prefix, one blank line, then the text verbatim.
pub fn user_message(text: &ExtractedText) -> String {
    format!("{USER_PROMPT_PREFIX}\n\n{}", text.as_str())
}

/// Raw text the model returned for one [`PromptRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply(String);

impl ModelReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
