//! Best-effort extraction of a JSON payload embedded in free text.
//!
//! Agent output is produced by an unreliable generator: it may be a bare
//! JSON document, valid JSON wrapped in commentary or a markdown fence,
//! or contain no JSON at all. Extraction never fails; callers get an
//! empty mapping and a validity flag instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*\n(.*?)\n\s*```").unwrap());

/// Extract a JSON value from `response_text`.
///
/// Attempts, in order, first success wins:
/// 1. Parse the entire text as JSON.
/// 2. Parse the innermost content of a ```` ```json ```` fenced block.
///
/// Returns `(parsed, true)` on success, `(empty object, false)` otherwise.
pub fn extract_json(response_text: &str) -> (Value, bool) {
    if let Ok(value) = serde_json::from_str::<Value>(response_text.trim()) {
        return (value, true);
    }

    if let Some(captures) = JSON_FENCE.captures(response_text) {
        let inner = captures[1].trim();
        if let Ok(value) = serde_json::from_str::<Value>(inner) {
            return (value, true);
        }
    }

    (Value::Object(Map::new()), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_text_round_trip() {
        let value = json!({"id": 7, "items": ["a", "b"]});
        let text = serde_json::to_string(&value).unwrap();
        let (parsed, valid) = extract_json(&text);
        assert!(valid);
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_fenced_block_round_trip() {
        let value = json!({"amount": 120.5});
        let text = format!(
            "Here is the result:\n```json\n{}\n```\nLet me know!",
            serde_json::to_string(&value).unwrap()
        );
        let (parsed, valid) = extract_json(&text);
        assert!(valid);
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_multiline_fenced_block() {
        let text = "```json\n{\n  \"id\": 1,\n  \"amount\": 2\n}\n```";
        let (parsed, valid) = extract_json(text);
        assert!(valid);
        assert_eq!(parsed, json!({"id": 1, "amount": 2}));
    }

    #[test]
    fn test_no_json_returns_empty_mapping() {
        let (parsed, valid) = extract_json("I could not find anything.");
        assert!(!valid);
        assert_eq!(parsed, json!({}));
    }

    #[test]
    fn test_malformed_fence_is_invalid() {
        let (parsed, valid) = extract_json("```json\n{not valid json\n```");
        assert!(!valid);
        assert_eq!(parsed, json!({}));
    }

    #[test]
    fn test_empty_string() {
        let (_, valid) = extract_json("");
        assert!(!valid);
    }
}
