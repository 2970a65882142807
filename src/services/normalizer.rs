//! Turns raw model output into fixed-shape envelopes.
//!
//! Missing keys default to empty values. Each item is decoded into its typed
//! shape; items that fail to decode are dropped and counted, never forwarded.

use serde_json::{Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ArtifactKind, Insight, Recommendation, Template, TemplateEnvelope};

/// Decoded items plus the number of items that were discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Items that decoded.
    pub items: Vec<T>,
    /// Items that did not.
    pub dropped: usize,
}

/// Strip a surrounding markdown fence, if any, and trim.
pub fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Info string such as `json`, with or without a newline after it
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse model output as a JSON object.
pub fn parse_object(raw: &str) -> DomainResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(extract_json_from_response(raw))? {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::SerializationError(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

/// Decode the array under `key`; a missing or non-array value yields no items.
pub fn decode_items<T>(
    object: &mut Map<String, Value>,
    key: &str,
    decode: impl Fn(Value) -> Result<T, String>,
) -> Decoded<T> {
    let values = match object.remove(key) {
        Some(Value::Array(values)) => values,
        Some(other) => {
            tracing::warn!(key, found = json_type(&other), "model returned a non-array collection");
            Vec::new()
        }
        None => Vec::new(),
    };

    let mut items = Vec::with_capacity(values.len());
    let mut dropped = 0;
    for (index, value) in values.into_iter().enumerate() {
        match decode(value) {
            Ok(item) => items.push(item),
            Err(reason) => {
                dropped += 1;
                tracing::debug!(key, index, %reason, "dropping malformed item");
            }
        }
    }
    if dropped > 0 {
        tracing::warn!(key, dropped, kept = items.len(), "dropped malformed model items");
    }
    Decoded { items, dropped }
}

/// Decode a smart-templates reply for `kind`.
pub fn normalize_templates(kind: ArtifactKind, raw: &str) -> DomainResult<TemplateEnvelope> {
    let mut object = parse_object(raw)?;
    let templates = decode_items(&mut object, "templates", |value| Template::decode(kind, value));

    let suggested_fields = match object.remove("suggestedFields") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let adaptation_reasoning = match object.remove("adaptationReasoning") {
        Some(Value::String(text)) => text,
        _ => String::new(),
    };

    Ok(TemplateEnvelope {
        templates: templates.items,
        suggested_fields,
        adaptation_reasoning,
        degraded: false,
    })
}

/// Decode a recommendations reply.
pub fn normalize_recommendations(raw: &str) -> DomainResult<Decoded<Recommendation>> {
    let mut object = parse_object(raw)?;
    Ok(decode_items(&mut object, "recommendations", Recommendation::decode))
}

/// Decode an insights reply.
pub fn normalize_insights(raw: &str) -> DomainResult<Decoded<Insight>> {
    let mut object = parse_object(raw)?;
    Ok(decode_items(&mut object, "insights", Insight::decode))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
