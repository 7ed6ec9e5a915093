//! JSON Extraction
//!
//! Models frequently wrap JSON answers in a Markdown fence. Only one leading
//! fence line (`` ```json `` or `` ``` ``) and one trailing `` ``` `` are
//! removed; nothing else is repaired. A parse failure keeps the raw text.

use serde::de::DeserializeOwned;
use tracing::error;

use crate::constants::llm::LOG_PREVIEW_CHARS;
use crate::types::{CodeIntelError, Result};

/// Strip one surrounding Markdown code fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();

    if s.starts_with("```") {
        s = match s.find('\n') {
            Some(newline) => &s[newline + 1..],
            None => s.trim_start_matches('`').trim_start_matches("json"),
        };
        if let Some(body) = s.trim_end().strip_suffix("```") {
            s = body;
        }
    }

    s.trim()
}

/// Parse a model answer as `T` after fence stripping.
pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|e| {
        error!(
            "Failed to parse model output as JSON: {} (raw: {})",
            e,
            preview(raw)
        );
        CodeIntelError::ResponseParse {
            message: e.to_string(),
            raw: raw.to_string(),
        }
    })
}

/// First characters of a model answer for log lines
pub fn preview(text: &str) -> String {
    if text.chars().count() <= LOG_PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_plain_fence() {
        let input = "  ```\n[1, 2]\n```  ";
        assert_eq!(strip_code_fences(input), "[1, 2]");
    }

    #[test]
    fn test_unfenced_untouched() {
        assert_eq!(strip_code_fences(" {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let bare = r#"{"suggestedComponents":[{"componentName":"Button","reason":"r"}],"optimizedPrompt":"p"}"#;
        let fenced = format!("```json\n{}\n```", bare);
        let a: Value = parse_json_response(bare).unwrap();
        let b: Value = parse_json_response(&fenced).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["optimizedPrompt"], json!("p"));
    }

    #[test]
    fn test_parse_failure_keeps_raw() {
        let raw = "Sure! Here are some components.";
        let err = parse_json_response::<Value>(raw).unwrap_err();
        assert_eq!(err.raw_response(), Some(raw));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(LOG_PREVIEW_CHARS + 10);
        assert_eq!(preview(&long).len(), LOG_PREVIEW_CHARS + 3);
        assert_eq!(preview("short"), "short");
    }

    proptest! {
        #[test]
        fn prop_fence_is_transparent(
            map in proptest::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,12}", 0..5)
        ) {
            let bare = serde_json::to_string_pretty(&map).unwrap();
            let fenced = format!("```json\n{}\n```", bare);
            let a: Value = parse_json_response(&bare).unwrap();
            let b: Value = parse_json_response(&fenced).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
