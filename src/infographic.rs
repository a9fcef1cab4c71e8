//! Typed infographic content and whole-section replacement.
//!
//! [`InfographicResult`] mirrors [`crate::schema::full_schema`] field for
//! field and serialises with the same camelCase keys, so a value decoded
//! from a model answer can be handed to any JSON consumer unchanged.
//!
//! Sections are replaced wholesale through [`SectionValue`]; nothing in this
//! crate merges inside a section.

use crate::schema::SectionKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Author used when a quote has no human author.
pub const DOCUMENT_SOURCE_AUTHOR: &str = "Document Source";

/// A headline figure and what it measures, e.g. `"85%"` / `"customer retention"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

/// Chart rendering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Pie,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartType::Bar => f.write_str("bar"),
            ChartType::Pie => f.write_str("pie"),
        }
    }
}

/// One chart point. `value` may be a qualitative 0-100 estimate when the
/// document has no literal figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    /// True when the quote is synthesised from the document rather than attributed.
    pub fn is_document_sourced(&self) -> bool {
        self.author == DOCUMENT_SOURCE_AUTHOR
    }
}

/// The full structured content of one infographic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfographicResult {
    pub title: String,
    pub tagline: String,
    pub summary: String,
    pub primary_stat: Stat,
    pub secondary_stats: Vec<Stat>,
    pub chart_title: String,
    /// Not in the schema's `required` list; absent means bar.
    #[serde(default)]
    pub chart_type: ChartType,
    pub chart_data: Vec<ChartDatum>,
    pub key_takeaways: Vec<String>,
    pub quote: Quote,
    pub topics: Vec<String>,
}

/// The value of one section, tagged by its key.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionValue {
    Title(String),
    Tagline(String),
    Summary(String),
    PrimaryStat(Stat),
    SecondaryStats(Vec<Stat>),
    ChartTitle(String),
    ChartType(ChartType),
    ChartData(Vec<ChartDatum>),
    KeyTakeaways(Vec<String>),
    Quote(Quote),
    Topics(Vec<String>),
}

impl SectionValue {
    pub fn key(&self) -> SectionKey {
        match self {
            SectionValue::Title(_) => SectionKey::Title,
            SectionValue::Tagline(_) => SectionKey::Tagline,
            SectionValue::Summary(_) => SectionKey::Summary,
            SectionValue::PrimaryStat(_) => SectionKey::PrimaryStat,
            SectionValue::SecondaryStats(_) => SectionKey::SecondaryStats,
            SectionValue::ChartTitle(_) => SectionKey::ChartTitle,
            SectionValue::ChartType(_) => SectionKey::ChartType,
            SectionValue::ChartData(_) => SectionKey::ChartData,
            SectionValue::KeyTakeaways(_) => SectionKey::KeyTakeaways,
            SectionValue::Quote(_) => SectionKey::Quote,
            SectionValue::Topics(_) => SectionKey::Topics,
        }
    }

    /// Decode a JSON value as the section named by `key`.
    pub fn from_json(key: SectionKey, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match key {
            SectionKey::Title => SectionValue::Title(serde_json::from_value(value)?),
            SectionKey::Tagline => SectionValue::Tagline(serde_json::from_value(value)?),
            SectionKey::Summary => SectionValue::Summary(serde_json::from_value(value)?),
            SectionKey::PrimaryStat => SectionValue::PrimaryStat(serde_json::from_value(value)?),
            SectionKey::SecondaryStats => {
                SectionValue::SecondaryStats(serde_json::from_value(value)?)
            }
            SectionKey::ChartTitle => SectionValue::ChartTitle(serde_json::from_value(value)?),
            SectionKey::ChartType => SectionValue::ChartType(serde_json::from_value(value)?),
            SectionKey::ChartData => SectionValue::ChartData(serde_json::from_value(value)?),
            SectionKey::KeyTakeaways => SectionValue::KeyTakeaways(serde_json::from_value(value)?),
            SectionKey::Quote => SectionValue::Quote(serde_json::from_value(value)?),
            SectionKey::Topics => SectionValue::Topics(serde_json::from_value(value)?),
        })
    }

    /// The section as plain JSON, without the key.
    pub fn to_json(&self) -> Value {
        let encoded = match self {
            SectionValue::Title(v)
            | SectionValue::Tagline(v)
            | SectionValue::Summary(v)
            | SectionValue::ChartTitle(v) => serde_json::to_value(v),
            SectionValue::PrimaryStat(v) => serde_json::to_value(v),
            SectionValue::SecondaryStats(v) => serde_json::to_value(v),
            SectionValue::ChartType(v) => serde_json::to_value(v),
            SectionValue::ChartData(v) => serde_json::to_value(v),
            SectionValue::KeyTakeaways(v) | SectionValue::Topics(v) => serde_json::to_value(v),
            SectionValue::Quote(v) => serde_json::to_value(v),
        };
        // These types have only string keys and finite-or-null numbers.
        encoded.unwrap_or(Value::Null)
    }
}

impl InfographicResult {
    /// Current value of one section.
    pub fn section(&self, key: SectionKey) -> SectionValue {
        match key {
            SectionKey::Title => SectionValue::Title(self.title.clone()),
            SectionKey::Tagline => SectionValue::Tagline(self.tagline.clone()),
            SectionKey::Summary => SectionValue::Summary(self.summary.clone()),
            SectionKey::PrimaryStat => SectionValue::PrimaryStat(self.primary_stat.clone()),
            SectionKey::SecondaryStats => {
                SectionValue::SecondaryStats(self.secondary_stats.clone())
            }
            SectionKey::ChartTitle => SectionValue::ChartTitle(self.chart_title.clone()),
            SectionKey::ChartType => SectionValue::ChartType(self.chart_type),
            SectionKey::ChartData => SectionValue::ChartData(self.chart_data.clone()),
            SectionKey::KeyTakeaways => SectionValue::KeyTakeaways(self.key_takeaways.clone()),
            SectionKey::Quote => SectionValue::Quote(self.quote.clone()),
            SectionKey::Topics => SectionValue::Topics(self.topics.clone()),
        }
    }

    /// Replace one section wholesale, returning the value it replaced.
    pub fn apply_section(&mut self, value: SectionValue) -> SectionValue {
        match value {
            SectionValue::Title(v) => SectionValue::Title(std::mem::replace(&mut self.title, v)),
            SectionValue::Tagline(v) => {
                SectionValue::Tagline(std::mem::replace(&mut self.tagline, v))
            }
            SectionValue::Summary(v) => {
                SectionValue::Summary(std::mem::replace(&mut self.summary, v))
            }
            SectionValue::PrimaryStat(v) => {
                SectionValue::PrimaryStat(std::mem::replace(&mut self.primary_stat, v))
            }
            SectionValue::SecondaryStats(v) => {
                SectionValue::SecondaryStats(std::mem::replace(&mut self.secondary_stats, v))
            }
            SectionValue::ChartTitle(v) => {
                SectionValue::ChartTitle(std::mem::replace(&mut self.chart_title, v))
            }
            SectionValue::ChartType(v) => {
                SectionValue::ChartType(std::mem::replace(&mut self.chart_type, v))
            }
            SectionValue::ChartData(v) => {
                SectionValue::ChartData(std::mem::replace(&mut self.chart_data, v))
            }
            SectionValue::KeyTakeaways(v) => {
                SectionValue::KeyTakeaways(std::mem::replace(&mut self.key_takeaways, v))
            }
            SectionValue::Quote(v) => SectionValue::Quote(std::mem::replace(&mut self.quote, v)),
            SectionValue::Topics(v) => SectionValue::Topics(std::mem::replace(&mut self.topics, v)),
        }
    }

    /// Soft expectations the prompt asks for but the schema does not enforce.
    ///
    /// Returns one human-readable note per unmet expectation; an empty list
    /// means the result looks the way the prompts describe.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();

        for (name, text) in [
            ("title", &self.title),
            ("tagline", &self.tagline),
            ("chartTitle", &self.chart_title),
        ] {
            if text.trim().is_empty() {
                notes.push(format!("{name} is empty"));
            }
        }

        let words = self.summary.split_whitespace().count();
        if words > 50 {
            notes.push(format!("summary has {words} words (advisory max 50)"));
        }

        let ranges: [(&str, usize, usize, usize); 4] = [
            ("secondaryStats", self.secondary_stats.len(), 3, 4),
            ("chartData", self.chart_data.len(), 3, 5),
            ("keyTakeaways", self.key_takeaways.len(), 4, 5),
            ("topics", self.topics.len(), 3, 4),
        ];
        for (name, len, min, max) in ranges {
            if len < min || len > max {
                notes.push(format!("{name} has {len} entries (advisory {min}-{max})"));
            }
        }

        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "title": "Q3 Platform Review",
            "tagline": "Faster, cheaper, steadier",
            "summary": "Latency fell while costs dropped across every region.",
            "primaryStat": { "value": "42%", "label": "lower p99 latency" },
            "secondaryStats": [
                { "value": "$1.2M", "label": "annual savings" },
                { "value": "99.98%", "label": "uptime" },
                { "value": "3", "label": "regions migrated" }
            ],
            "chartTitle": "Latency by region",
            "chartType": "pie",
            "chartData": [
                { "name": "EU", "value": 120 },
                { "name": "US", "value": 95.5 },
                { "name": "APAC", "value": 140 }
            ],
            "keyTakeaways": ["a", "b", "c", "d"],
            "quote": { "text": "We shipped it.", "author": "Document Source" },
            "topics": ["latency", "cost", "migration"]
        })
    }

    #[test]
    fn decodes_camel_case_keys() {
        let r: InfographicResult = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(r.primary_stat.value, "42%");
        assert_eq!(r.chart_type, ChartType::Pie);
        assert_eq!(r.chart_data[1].value, 95.5);
        assert!(r.quote.is_document_sourced());
        assert!(r.advisories().is_empty(), "{:?}", r.advisories());
    }

    #[test]
    fn missing_chart_type_defaults_to_bar() {
        let mut v = sample_json();
        v.as_object_mut().unwrap().remove("chartType");
        let r: InfographicResult = serde_json::from_value(v).unwrap();
        assert_eq!(r.chart_type, ChartType::Bar);
    }

    #[test]
    fn unknown_chart_type_is_rejected() {
        let mut v = sample_json();
        v["chartType"] = json!("line");
        assert!(serde_json::from_value::<InfographicResult>(v).is_err());
    }

    #[test]
    fn serialises_back_to_schema_keys() {
        let r: InfographicResult = serde_json::from_value(sample_json()).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        for key in SectionKey::ALL {
            assert!(v.get(key.as_str()).is_some(), "missing {key}");
        }
    }

    #[test]
    fn apply_section_replaces_whole_field() {
        let mut r: InfographicResult = serde_json::from_value(sample_json()).unwrap();
        let previous = r.apply_section(SectionValue::Quote(Quote {
            text: "Punchier.".into(),
            author: "CTO".into(),
        }));

        assert_eq!(r.quote.author, "CTO");
        assert_eq!(
            previous,
            SectionValue::Quote(Quote {
                text: "We shipped it.".into(),
                author: "Document Source".into()
            })
        );
        // Nothing else moved.
        assert_eq!(r.title, "Q3 Platform Review");
    }

    #[test]
    fn section_json_matches_field_json() {
        let r: InfographicResult = serde_json::from_value(sample_json()).unwrap();
        let full = sample_json();
        for key in SectionKey::ALL {
            let section = r.section(key);
            assert_eq!(section.key(), key);
            let decoded = SectionValue::from_json(key, full[key.as_str()].clone()).unwrap();
            assert_eq!(decoded, section);
        }
    }

    #[test]
    fn section_decode_rejects_wrong_shape() {
        assert!(SectionValue::from_json(SectionKey::Quote, json!("just text")).is_err());
        assert!(SectionValue::from_json(SectionKey::Topics, json!({"a": 1})).is_err());
    }

    #[test]
    fn advisories_flag_out_of_range_lists() {
        let mut r: InfographicResult = serde_json::from_value(sample_json()).unwrap();
        r.topics.clear();
        r.summary = "word ".repeat(60);
        r.tagline = "  ".into();

        let notes = r.advisories();
        assert!(notes.iter().any(|n| n.starts_with("topics has 0")));
        assert!(notes.iter().any(|n| n.contains("60 words")));
        assert!(notes.iter().any(|n| n == "tagline is empty"));
        assert_eq!(notes.len(), 3);
    }
}
