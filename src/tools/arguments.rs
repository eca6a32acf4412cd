//! Typed access to tool call arguments.

use crate::error::{AgenticsError, Result};

/// Wrapper around decoded tool call arguments.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Decode the provider's raw JSON argument blob.
    ///
    /// An empty blob is an empty object. Floats with no fractional part are
    /// normalized to integers so arithmetic tools receive `30`, not `30.0`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let mut value = if trimmed.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| {
                AgenticsError::InvalidArgument(format!("Failed to decode tool arguments: {e}"))
            })?
        };
        if !value.is_object() {
            return Err(AgenticsError::InvalidArgument(format!(
                "Tool arguments must be a JSON object, got: {trimmed}"
            )));
        }
        normalize_whole_numbers(&mut value);
        Ok(Self { value })
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgenticsError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| AgenticsError::InvalidArgument(format!("Missing integer argument: {key}")))
    }
}

fn normalize_whole_numbers(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Number(n) if !n.is_i64() && !n.is_u64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    *value = serde_json::Value::from(f as i64);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(normalize_whole_numbers),
        serde_json::Value::Object(map) => map.values_mut().for_each(normalize_whole_numbers),
        _ => {}
    }
}
