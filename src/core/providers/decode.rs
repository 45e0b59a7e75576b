//! Tolerant decoding of `/models` payloads
//!
//! OpenAI-compatible servers disagree on the list shape. Accepted forms:
//! `{"data": [...]}`, `{"models": [...]}` and a bare array, where each entry
//! is either an object or a plain model id string.

use super::error::UpstreamError;
use crate::core::types::{LLMModel, ModelCapability, ModelPricing};
use serde_json::Value;

const ID_KEYS: &[&str] = &["id", "model", "name"];

const CONTEXT_KEYS: &[&str] = &[
    "context_length",
    "context_window",
    "max_context_length",
    "contextWindow",
    "max_context_tokens",
    "max_tokens",
];

/// Decode a model list payload for `provider_id`
///
/// Entries without a usable id are skipped. A payload that is not a list in
/// any of the accepted shapes is a decode error.
pub fn parse_model_list(provider_id: &str, body: &Value) -> Result<Vec<LLMModel>, UpstreamError> {
    let entries = body
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| body.get("models").and_then(Value::as_array))
        .or_else(|| body.as_array())
        .ok_or_else(|| UpstreamError::Decode("expected a model list".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| parse_model(provider_id, entry))
        .collect())
}

fn parse_model(provider_id: &str, entry: &Value) -> Option<LLMModel> {
    if let Some(id) = entry.as_str() {
        return non_empty(id).map(|id| LLMModel::new(provider_id, id));
    }

    let id = ID_KEYS
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str).and_then(non_empty))?;

    let mut model = LLMModel::new(provider_id, id);
    if let Some(name) = entry.get("name").and_then(Value::as_str).and_then(non_empty) {
        model = model.with_name(name);
    }
    if let Some(window) = context_window(entry) {
        model = model.with_context_window(window);
    }
    if let Some(pricing) = entry.get("pricing").and_then(pricing) {
        model = model.with_pricing(pricing);
    }
    for capability in capabilities(entry) {
        model = model.with_capability(capability);
    }
    Some(model)
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn context_window(entry: &Value) -> Option<u32> {
    let from = |value: &Value| CONTEXT_KEYS.iter().find_map(|key| value.get(*key).and_then(number));

    from(entry)
        .or_else(|| entry.get("top_provider").and_then(from))
        .and_then(|window| u32::try_from(window as u64).ok())
        .filter(|window| *window > 0)
}

fn pricing(value: &Value) -> Option<ModelPricing> {
    Some(ModelPricing {
        prompt: value.get("prompt").and_then(number)?,
        completion: value.get("completion").and_then(number)?,
    })
}

/// Numbers arrive either as JSON numbers or as decimal strings
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn capabilities(entry: &Value) -> Vec<ModelCapability> {
    let mut found = Vec::new();

    let strings = |value: Option<&Value>| -> Vec<String> {
        value
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_ascii_lowercase)
                    .collect()
            })
            .unwrap_or_default()
    };

    let modalities = strings(
        entry
            .get("architecture")
            .and_then(|a| a.get("input_modalities")),
    );
    if modalities.iter().any(|m| m == "image") {
        found.push(ModelCapability::Vision);
    }

    let parameters = strings(entry.get("supported_parameters"));
    if parameters.iter().any(|p| p == "tools" || p == "tool_choice") {
        found.push(ModelCapability::Tools);
    }
    if parameters
        .iter()
        .any(|p| p == "response_format" || p == "structured_outputs")
    {
        found.push(ModelCapability::JsonMode);
    }
    if parameters.iter().any(|p| p == "stream") {
        found.push(ModelCapability::Streaming);
    }

    found
}
