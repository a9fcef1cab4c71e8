//! Schema registry: the JSON shape of an infographic and of each section.
//!
//! The shapes are sent to the model inside the system prompt (OpenRouter's
//! JSON mode does not enforce a schema, so the prompt carries it). They are
//! built once on first use and never mutated.
//!
//! Section keys are the closed [`SectionKey`] enumeration. Only the string
//! boundary ([`SectionKey::from_str`], [`section_schema_by_name`]) can fail,
//! with [`InfopageError::SchemaNotFound`].

use crate::error::InfopageError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// One top-level key of an infographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Title,
    Tagline,
    Summary,
    PrimaryStat,
    SecondaryStats,
    ChartTitle,
    ChartType,
    ChartData,
    KeyTakeaways,
    Quote,
    Topics,
}

impl SectionKey {
    /// Every key, in display order.
    pub const ALL: [SectionKey; 11] = [
        SectionKey::Title,
        SectionKey::Tagline,
        SectionKey::Summary,
        SectionKey::PrimaryStat,
        SectionKey::SecondaryStats,
        SectionKey::ChartTitle,
        SectionKey::ChartType,
        SectionKey::ChartData,
        SectionKey::KeyTakeaways,
        SectionKey::Quote,
        SectionKey::Topics,
    ];

    /// The key as it appears in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Title => "title",
            SectionKey::Tagline => "tagline",
            SectionKey::Summary => "summary",
            SectionKey::PrimaryStat => "primaryStat",
            SectionKey::SecondaryStats => "secondaryStats",
            SectionKey::ChartTitle => "chartTitle",
            SectionKey::ChartType => "chartType",
            SectionKey::ChartData => "chartData",
            SectionKey::KeyTakeaways => "keyTakeaways",
            SectionKey::Quote => "quote",
            SectionKey::Topics => "topics",
        }
    }

    /// This key's sub-schema.
    pub fn schema(&self) -> &'static Value {
        section_schema(*self)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = InfopageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| InfopageError::SchemaNotFound { key: s.to_string() })
    }
}

/// Keys listed in the schema's `required` array.
///
/// `chartType` is a property of the schema but is not required; decoding
/// falls back to a bar chart when a model leaves it out.
pub const REQUIRED_KEYS: [&str; 10] = [
    "title",
    "tagline",
    "summary",
    "primaryStat",
    "secondaryStats",
    "chartData",
    "chartTitle",
    "keyTakeaways",
    "quote",
    "topics",
];

fn stat_schema(described: bool) -> Value {
    if described {
        json!({
            "type": "object",
            "properties": {
                "value": { "type": "string", "description": "The number/value e.g. '85%', '$1M'" },
                "label": { "type": "string", "description": "Description of the stat" }
            },
            "required": ["value", "label"]
        })
    } else {
        json!({
            "type": "object",
            "properties": {
                "value": { "type": "string" },
                "label": { "type": "string" }
            },
            "required": ["value", "label"]
        })
    }
}

fn build_section_schema(key: SectionKey) -> Value {
    match key {
        SectionKey::Title => json!({ "type": "string", "description": "Main title of the document" }),
        SectionKey::Tagline => json!({ "type": "string", "description": "A short, punchy subtitle" }),
        SectionKey::Summary => json!({ "type": "string", "description": "Brief executive summary" }),
        SectionKey::PrimaryStat => stat_schema(true),
        SectionKey::SecondaryStats => json!({
            "type": "array",
            "items": stat_schema(false),
            "description": "3-4 supporting statistics"
        }),
        SectionKey::ChartTitle => json!({ "type": "string", "description": "Title for the data visualization" }),
        SectionKey::ChartType => json!({
            "type": "string",
            "enum": ["bar", "pie"],
            "description": "Recommended chart type"
        }),
        SectionKey::ChartData => json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Category name" },
                    "value": { "type": "number", "description": "Numeric value" }
                },
                "required": ["name", "value"]
            },
            "description": "Data points for visualization"
        }),
        SectionKey::KeyTakeaways => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": "List of 4-5 key points"
        }),
        SectionKey::Quote => json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "author": { "type": "string", "description": "Author or 'Document Source'" }
            },
            "required": ["text", "author"]
        }),
        SectionKey::Topics => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": "3-4 main topic keywords"
        }),
    }
}

// Indexed by `SectionKey as usize`; ALL lists the variants in declaration order.
static SECTION_SCHEMAS: Lazy<Vec<Value>> =
    Lazy::new(|| SectionKey::ALL.iter().map(|&k| build_section_schema(k)).collect());

static FULL_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let properties: serde_json::Map<String, Value> = SectionKey::ALL
        .iter()
        .map(|&k| (k.as_str().to_string(), section_schema(k).clone()))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": REQUIRED_KEYS,
    })
});

static FULL_SCHEMA_JSON: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&*FULL_SCHEMA).unwrap_or_else(|_| FULL_SCHEMA.to_string())
});

/// The full infographic schema: every property plus the `required` list.
pub fn full_schema() -> &'static Value {
    &FULL_SCHEMA
}

/// Pretty-printed [`full_schema`], the exact text embedded in prompts.
pub fn full_schema_json() -> &'static str {
    &FULL_SCHEMA_JSON
}

/// Sub-schema for one section.
pub fn section_schema(key: SectionKey) -> &'static Value {
    &SECTION_SCHEMAS[key as usize]
}

/// Sub-schema for a section named by its JSON key.
pub fn section_schema_by_name(name: &str) -> Result<&'static Value, InfopageError> {
    let key: SectionKey = name.parse()?;
    Ok(section_schema(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_schema_has_every_property() {
        let props = full_schema()["properties"].as_object().unwrap();
        assert_eq!(props.len(), 11);
        for key in SectionKey::ALL {
            assert!(props.contains_key(key.as_str()), "missing {key}");
        }
    }

    #[test]
    fn properties_keep_display_order() {
        let props = full_schema()["properties"].as_object().unwrap();
        let order: Vec<&str> = props.keys().map(String::as_str).collect();
        let expected: Vec<&str> = SectionKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn required_list_is_fixed() {
        let required: Vec<&str> = full_schema()["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_KEYS);
        assert!(!required.contains(&"chartType"));
    }

    #[test]
    fn all_is_in_declaration_order() {
        for (i, key) in SectionKey::ALL.iter().enumerate() {
            assert_eq!(*key as usize, i);
        }
    }

    #[test]
    fn chart_type_is_a_closed_enum() {
        let s = section_schema(SectionKey::ChartType);
        assert_eq!(s["enum"], json!(["bar", "pie"]));
    }

    #[test]
    fn lookup_by_name() {
        let quote = section_schema_by_name("quote").unwrap();
        assert_eq!(quote["required"], json!(["text", "author"]));

        let err = section_schema_by_name("footer").unwrap_err();
        assert!(matches!(err, InfopageError::SchemaNotFound { ref key } if key == "footer"));
    }

    #[test]
    fn key_names_round_trip_through_from_str() {
        for key in SectionKey::ALL {
            assert_eq!(key.as_str().parse::<SectionKey>().unwrap(), key);
        }
        // JSON keys are camelCase; snake_case spellings are unknown.
        assert!("primary_stat".parse::<SectionKey>().is_err());
    }

    #[test]
    fn serde_name_matches_as_str() {
        for key in SectionKey::ALL {
            assert_eq!(serde_json::to_value(key).unwrap(), json!(key.as_str()));
        }
    }

    #[test]
    fn pretty_json_is_the_full_schema() {
        let reparsed: Value = serde_json::from_str(full_schema_json()).unwrap();
        assert_eq!(&reparsed, full_schema());
    }
}
