use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Matches a payload wrapped in a markdown code fence, optionally tagged `json`.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*```(?:json)?\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

/// Turns the submitted insights into the text that gets stored.
///
/// Strings are stored as text with any code fence removed, objects and arrays
/// are serialized. Null and blank input store nothing. The result is not
/// validated as JSON; the trend aggregator copes with bad payloads.
pub fn normalize_insights(insights: Option<Value>) -> Option<String> {
    let text = match insights? {
        Value::Null => return None,
        Value::String(text) => strip_code_fence(&text).to_string(),
        other => other.to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}

fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}
