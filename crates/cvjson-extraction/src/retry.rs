//! Retry decorator for model invokers.
//!
//! The pipeline itself makes exactly one model call. Callers that want
//! retries wrap their invoker in [`RetryingInvoker`], which retries transient
//! provider failures (transport errors, 429 and 5xx) with exponential backoff:
//! with a 500 ms base the waits are 500 ms → 1 s → 2 s. Retries never sleep past
//! the caller's deadline.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use cvjson_core::error::{CvJsonError, Result};
use cvjson_core::extraction::{Deadline, ModelInvoker};
use cvjson_core::prompt::{ModelReply, PromptRequest};

pub struct RetryingInvoker<I> {
    inner: I,
    max_retries: u32,
    base_backoff: Duration,
}

impl<I: ModelInvoker> RetryingInvoker<I> {
    pub fn new(inner: I, max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_backoff,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(factor)
    }
}

fn is_transient(err: &CvJsonError) -> bool {
    match err {
        CvJsonError::ModelInvocationFailed { status: None, .. } => true,
        CvJsonError::ModelInvocationFailed {
            status: Some(code), ..
        } => *code == 429 || *code >= 500,
        _ => false,
    }
}

#[async_trait]
impl<I: ModelInvoker> ModelInvoker for RetryingInvoker<I> {
    async fn invoke(
        &self,
        request: &PromptRequest,
        deadline: Option<Deadline>,
    ) -> Result<ModelReply> {
        let mut attempt = 0;
        loop {
            let err = match self.inner.invoke(request, deadline).await {
                Ok(reply) => return Ok(reply),
                Err(err) => err,
            };

            if attempt >= self.max_retries || !is_transient(&err) {
                return Err(err);
            }

            attempt += 1;
            let backoff = self.backoff(attempt);
            if let Some(deadline) = deadline {
                if deadline.remaining().map_or(true, |left| left <= backoff) {
                    warn!(attempt, error = %err, "Deadline leaves no room for another model call");
                    return Err(err);
                }
            }

            warn!(
                attempt,
                max_retries = self.max_retries,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "Model call failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}
