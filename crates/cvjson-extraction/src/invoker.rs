use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cvjson_core::config::AppConfig;
use cvjson_core::error::{CvJsonError, Result};
use cvjson_core::extraction::{Deadline, ModelInvoker};
use cvjson_core::prompt::{ModelReply, PromptRequest};

/// Chat-completions client for OpenAI-compatible providers.
pub struct OpenAiInvoker {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

// ── Chat Completions API request/response types ────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Implementation ─────────────────────────────────────────────────────────

impl OpenAiInvoker {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CvJsonError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body(request: &PromptRequest) -> ChatRequest<'_> {
        ChatRequest {
            model: request.model(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user(),
                },
            ],
            temperature: request.temperature(),
            max_tokens: request.max_output_tokens(),
            stream: false,
        }
    }

    /// Pulls the first choice's content out of a chat-completions response body.
    fn parse_completion(body: &str) -> Result<ModelReply> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| CvJsonError::invocation(format!("failed to parse API response: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CvJsonError::invocation("API response contained no choices"))?;

        tracing::debug!(finish_reason = ?choice.finish_reason, "Completion received");

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(ModelReply::new(content)),
            _ => Err(CvJsonError::invocation("No content received from the model")),
        }
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

#[async_trait]
impl ModelInvoker for OpenAiInvoker {
    async fn invoke(
        &self,
        request: &PromptRequest,
        deadline: Option<Deadline>,
    ) -> Result<ModelReply> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::build_body(request));

        if let Some(deadline) = deadline {
            let remaining = deadline
                .remaining()
                .ok_or_else(|| CvJsonError::invocation("deadline exceeded before model call"))?;
            builder = builder.timeout(remaining);
        }

        tracing::debug!(
            model = %request.model(),
            system_len = request.system().len(),
            user_len = request.user().len(),
            max_tokens = ?request.max_output_tokens(),
            "Sending chat completion request"
        );

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CvJsonError::invocation("model request timed out")
            } else {
                CvJsonError::invocation(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CvJsonError::ModelInvocationFailed {
                status: Some(status.as_u16()),
                message: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(CvJsonError::ModelInvocationFailed {
                status: Some(status.as_u16()),
                message: Self::error_message(&body),
            });
        }

        let reply = Self::parse_completion(&body)?;
        tracing::debug!(reply_len = reply.as_str().len(), "Received chat completion");
        Ok(reply)
    }
}
