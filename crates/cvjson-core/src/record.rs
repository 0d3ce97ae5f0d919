use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A validated model reply: always a JSON object at the top level.
///
/// Serializes transparently, so handlers can return it as the response body
/// exactly as the model produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredRecord(Map<String, Value>);

impl StructuredRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// How much of the schema the response validator enforces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Any JSON object is accepted as-is.
    #[default]
    Lenient,
    /// Required keys, list sections and per-item fields are checked.
    Strict,
}

impl ValidationMode {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "strict" | "deep" => Self::Strict,
            _ => Self::Lenient,
        }
    }
}
