use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tiktoken_rs::CoreBPE;

use cvjson_core::error::{CvJsonError, Result};

/// Counts model tokens with the model's own BPE encoding.
///
/// Encoders are loaded lazily and cached per model name; a counter can be
/// shared freely between requests.
#[derive(Default)]
pub struct TokenCounter {
    encoders: RwLock<HashMap<String, Arc<CoreBPE>>>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, text: &str, model: &str) -> Result<usize> {
        let encoder = self.encoder(model)?;
        Ok(encoder.encode_with_special_tokens(text).len())
    }

    fn encoder(&self, model: &str) -> Result<Arc<CoreBPE>> {
        let cached = self
            .encoders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .cloned();
        if let Some(encoder) = cached {
            return Ok(encoder);
        }

        let encoder = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            tracing::debug!(model = %model, error = %e, "No tokenizer for model");
            CvJsonError::UnsupportedModel(model.to_string())
        })?;

        let mut encoders = self
            .encoders
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let encoder = encoders
            .entry(model.to_string())
            .or_insert_with(|| Arc::new(encoder))
            .clone();
        Ok(encoder)
    }
}
