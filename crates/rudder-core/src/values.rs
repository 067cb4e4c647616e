//! Chart default values (`values.yaml`)

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};

/// Decoded key-value tree of a chart's default values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(pub JsonValue);

impl Default for Values {
    fn default() -> Self {
        Self::new()
    }
}

impl Values {
    /// Create empty values
    pub fn new() -> Self {
        Self(JsonValue::Object(serde_json::Map::new()))
    }

    /// Parse values from a YAML string
    ///
    /// A document holding only comments (or nothing at all) yields an empty
    /// mapping. Any top-level node other than a mapping is rejected. Merge
    /// keys (`<<: *anchor`) are expanded.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if is_blank_document(yaml) {
            return Ok(Self::new());
        }

        let mut doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        doc.apply_merge()?;

        let value = serde_json::to_value(doc)?;
        match value {
            JsonValue::Object(_) => Ok(Self(value)),
            JsonValue::Null => Ok(Self::new()),
            other => Err(CoreError::InvalidValues {
                message: format!("expected a mapping at the top level, found {}", kind_of(&other)),
            }),
        }
    }

    /// Parse values from raw `values.yaml` bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let yaml = std::str::from_utf8(bytes).map_err(|e| CoreError::InvalidValues {
            message: format!("invalid UTF-8: {}", e),
        })?;
        Self::from_yaml(yaml)
    }

    /// Get a value by dotted path (e.g., "image.tag")
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let parts: Vec<&str> = path.split('.').collect();
        get_nested(&self.0, &parts)
    }

    /// Get the inner JSON value
    pub fn inner(&self) -> &JsonValue {
        &self.0
    }

    /// Convert to JSON value
    pub fn into_inner(self) -> JsonValue {
        self.0
    }

    /// Check if values are empty
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Null => true,
            _ => false,
        }
    }
}

fn is_blank_document(yaml: &str) -> bool {
    yaml.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a mapping",
    }
}

fn get_nested<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    match path.split_first() {
        None => Some(value),
        Some((key, rest)) => match value {
            JsonValue::Object(map) => get_nested(map.get(*key)?, rest),
            JsonValue::Array(items) => {
                let idx: usize = key.parse().ok()?;
                get_nested(items.get(idx)?, rest)
            }
            _ => None,
        },
    }
}
