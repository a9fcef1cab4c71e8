//! Response parsing: message content → JSON → schema types.
//!
//! Two distinct failures are kept apart:
//!
//! * content that is not JSON at all → [`InfopageError::MalformedResponse`]
//! * JSON of the wrong shape → [`InfopageError::SchemaMismatch`]
//!
//! Both keep the raw content so callers can show or log what the model said.

use crate::error::InfopageError;
use crate::infographic::{InfographicResult, SectionValue};
use crate::schema::SectionKey;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Models sometimes wrap JSON in a fence even in JSON mode.
static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n?```$").unwrap());

/// Remove a single Markdown code fence wrapping the whole content.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match RE_OUTER_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Parse message content as JSON.
pub fn parse_json(content: &str) -> Result<Value, InfopageError> {
    serde_json::from_str(strip_code_fence(content)).map_err(|e| InfopageError::MalformedResponse {
        raw: content.to_string(),
        detail: e.to_string(),
    })
}

/// Decode a full infographic from parsed JSON.
pub fn decode_infographic(value: Value, raw: &str) -> Result<InfographicResult, InfopageError> {
    serde_json::from_value(value).map_err(|e| InfopageError::SchemaMismatch {
        detail: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Decode one section from parsed JSON.
///
/// JSON mode forces the model to answer with an object, so scalar and list
/// sections usually arrive wrapped as `{"<key>": value}`. A single-key
/// object named after the section is unwrapped first.
pub fn decode_section(
    key: SectionKey,
    value: Value,
    raw: &str,
) -> Result<SectionValue, InfopageError> {
    let value = unwrap_envelope(key, value);
    SectionValue::from_json(key, value).map_err(|e| InfopageError::SchemaMismatch {
        detail: format!("section '{key}': {e}"),
        raw: raw.to_string(),
    })
}

fn unwrap_envelope(key: SectionKey, value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(key.as_str()) => {
            map.remove(key.as_str()).unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infographic::{ChartType, Quote, Stat};
    use serde_json::json;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn leaves_inner_fences_alone() {
        let s = "{\"code\": \"```rust\\nfn main(){}\\n```\"}";
        assert_eq!(strip_code_fence(s), s);
    }

    #[test]
    fn not_json_keeps_raw() {
        let err = parse_json("not json").unwrap_err();
        match err {
            InfopageError::MalformedResponse { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_schema_mismatch() {
        let raw = r#"{"title": 3}"#;
        let v = parse_json(raw).unwrap();
        let err = decode_infographic(v, raw).unwrap_err();
        assert!(matches!(err, InfopageError::SchemaMismatch { .. }));
    }

    #[test]
    fn section_envelope_is_unwrapped() {
        let v = json!({ "title": "New Title" });
        assert_eq!(
            decode_section(SectionKey::Title, v, "").unwrap(),
            SectionValue::Title("New Title".into())
        );

        let v = json!({ "chartType": "pie" });
        assert_eq!(
            decode_section(SectionKey::ChartType, v, "").unwrap(),
            SectionValue::ChartType(ChartType::Pie)
        );

        let v = json!({ "secondaryStats": [{ "value": "1", "label": "one" }] });
        assert_eq!(
            decode_section(SectionKey::SecondaryStats, v, "").unwrap(),
            SectionValue::SecondaryStats(vec![Stat {
                value: "1".into(),
                label: "one".into()
            }])
        );
    }

    #[test]
    fn section_bare_object_is_used_directly() {
        let v = json!({ "text": "Bold move.", "author": "CEO" });
        assert_eq!(
            decode_section(SectionKey::Quote, v, "").unwrap(),
            SectionValue::Quote(Quote {
                text: "Bold move.".into(),
                author: "CEO".into()
            })
        );
    }

    #[test]
    fn section_wrong_shape_names_the_key() {
        let err = decode_section(SectionKey::Quote, json!({ "quote": 7 }), "{\"quote\":7}")
            .unwrap_err();
        match err {
            InfopageError::SchemaMismatch { detail, raw } => {
                assert!(detail.contains("quote"));
                assert_eq!(raw, "{\"quote\":7}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
