//! Next-node directives: `{"next": "<node>"}` replies from the model.

use crate::error::{AgenticsError, Result};

/// Field a directive names the next node with.
pub const NEXT_FIELD: &str = "next";

/// Extract the next node from a model reply.
///
/// A reply is a directive when, after trimming and removing a surrounding
/// code fence, it is a JSON object mentioning `next`. Such a reply must
/// decode and its `next` must be a string (or null); anything else fails the
/// turn. Replies that are not objects are plain content and yield `None`.
pub fn parse(content: &str) -> Result<Option<String>> {
    let body = strip_fence(content.trim());
    if !body.starts_with('{') || !body.contains(NEXT_FIELD) {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AgenticsError::InvalidDirective(format!("{e}: {body}")))?;
    let serde_json::Value::Object(map) = value else {
        return Err(AgenticsError::InvalidDirective(body.to_string()));
    };

    match map.get(NEXT_FIELD) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(next)) => {
            let next = next.trim();
            Ok((!next.is_empty()).then(|| next.to_string()))
        }
        Some(other) => Err(AgenticsError::InvalidDirective(format!(
            "'{NEXT_FIELD}' must be a string, got {other}"
        ))),
    }
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // drop the info string (e.g. `json`)
    match rest.find('\n') {
        Some(idx) => rest[idx + 1..].trim(),
        None => rest.trim(),
    }
}
