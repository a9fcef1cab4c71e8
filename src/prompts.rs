//! System prompts for infographic extraction and section revision.
//!
//! Every prompt lives here so that prompt changes touch exactly one file and
//! unit tests can inspect the text without a model in the loop.
//!
//! Callers can override the per-intent extraction prompt through
//! [`PromptSet`] (carried by [`crate::config::ClientConfig`]); the defaults
//! below are used for any intent without an override.

use crate::schema::{full_schema_json, SectionKey};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closing instruction shared by every prompt.
pub const BASE_JSON_INSTRUCTION: &str = "Output must be pure JSON matching the requested schema.";

/// User turn sent alongside the document during extraction.
pub const EXTRACTION_USER_TEXT: &str =
    "Analyze this document and generate the infographic data structure.";

/// User turn sent during section revision.
pub const REVISION_USER_TEXT: &str = "Generate the updated section JSON now.";

const SCHEMA_LEAD_IN: &str = "You must return a JSON object matching this exact schema:";

/// Narrative framing applied to an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Neutral, analytical one-pager.
    #[default]
    Informational,
    /// Persuasive, ROI-framed sales sheet.
    Selling,
    /// Retrospective project completion report.
    ProjectWrapup,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Informational, Intent::Selling, Intent::ProjectWrapup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Informational => "informational",
            Intent::Selling => "selling",
            Intent::ProjectWrapup => "project_wrapup",
        }
    }

    /// Framing text for this intent, without the schema.
    pub fn template(&self) -> &'static str {
        match self {
            Intent::Informational => INFORMATIONAL_TEMPLATE,
            Intent::Selling => SELLING_TEMPLATE,
            Intent::ProjectWrapup => PROJECT_WRAPUP_TEMPLATE,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "informational" => Ok(Intent::Informational),
            "selling" => Ok(Intent::Selling),
            "project_wrapup" => Ok(Intent::ProjectWrapup),
            other => Err(format!(
                "unknown intent '{other}' (expected informational, selling or project_wrapup)"
            )),
        }
    }
}

const INFORMATIONAL_TEMPLATE: &str = r#"You are an expert information designer and data analyst.
Your task is to analyze a document and extract content to build a compelling one-page infographic.

Rules:
1. Identify the main title and a catchy tagline.
2. Write a concise executive summary (max 50 words).
3. Find the single most impressive statistic (Primary Stat).
4. Find 3-4 other interesting statistics (Secondary Stats).
5. Extract data suitable for a chart (Bar or Pie). Identify at least 3-5 data points comparing categories or trends. If no explicit data exists, estimate qualitative comparison values (0-100) based on the text emphasis.
6. Extract 4-5 bullet points of key takeaways.
7. Find a powerful quote from the text or synthesize a summary quote. Use "Document Source" as the author when no person is quoted.
8. Identify 3-4 main topics or keywords.
9. You must use the entire page.

Tone: Neutral, clear, and analytical."#;

const SELLING_TEMPLATE: &str = r#"You are a world-class sales copywriter and marketing strategist.
Your task is to analyze a document (likely a brochure, whitepaper, or product sheet) and extract content to build a persuasive sales infographic.

Rules:
1. Title & Tagline: Must be benefit-driven and grab attention.
2. Summary: Focus on the "Value Proposition" - why should the customer care? (Max 50 words).
3. Primary Stat: The "Hero Metric" - the biggest ROI, growth number, or savings figure found.
4. Secondary Stats: 3-4 proof points that build credibility (users gained, dollars saved, speed improved).
5. Chart Data: 3-5 points visualizing the competitive advantage or growth trajectory.
6. Key Takeaways: List the top 4-5 selling points or features.
7. Quote: A testimonial or a strong claim about product superiority.
8. Topics: 3-4 main product pillars or market segments.

Tone: Energetic, persuasive, and confident."#;

const PROJECT_WRAPUP_TEMPLATE: &str = r#"You are a senior project manager and consultant.
Your task is to analyze a project document and extract content for a Project Completion Report infographic.

Rules:
1. Title: Project Name/ID. Tagline: The final status (e.g., "Delivered on time and under budget").
2. Summary: High-level overview of the project scope and final outcome (Max 50 words).
3. Primary Stat: The definition of success (e.g., "100% Adoption" or "2 Weeks Early").
4. Secondary Stats: 3-4 figures on resource usage, budget efficiency, or team size.
5. Chart Data: 3-5 points on timeline progress, budget split, or milestones achieved vs planned.
6. Key Takeaways: 4-5 major milestones hit or lessons learned.
7. Quote: A concluding remark from the project lead or stakeholder feedback.
8. Topics: 3-4 project phases or departments involved.

Tone: Professional, objective, and retrospective."#;

/// Assemble a full extraction prompt from framing text and the schema.
pub fn extraction_prompt_from_template(template: &str) -> String {
    format!(
        "{template}\n\n{BASE_JSON_INSTRUCTION}\n\n{SCHEMA_LEAD_IN}\n{}",
        full_schema_json()
    )
}

static DEFAULT_PROMPTS: Lazy<BTreeMap<Intent, String>> = Lazy::new(|| {
    Intent::ALL
        .iter()
        .map(|&i| (i, extraction_prompt_from_template(i.template())))
        .collect()
});

/// Default extraction prompt for an intent: template, JSON instruction and
/// the full schema.
pub fn extraction_prompt(intent: Intent) -> &'static str {
    DEFAULT_PROMPTS
        .get(&intent)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Prompt asking the model to rewrite one section.
///
/// `current` is embedded as pretty-printed JSON and `instruction` verbatim,
/// followed by the section's sub-schema.
pub fn section_prompt(key: SectionKey, current: &Value, instruction: &str) -> String {
    let current_json =
        serde_json::to_string_pretty(current).unwrap_or_else(|_| current.to_string());
    let schema_json =
        serde_json::to_string_pretty(key.schema()).unwrap_or_else(|_| key.schema().to_string());

    format!(
        "You are editing the \"{key}\" section of an infographic.\n\n\
Current Content: {current_json}\n\n\
User Instruction: {instruction}\n\n\
Task: Regenerate this section based on the user instruction. Maintain the tone of the document.\n\
Return ONLY the JSON compatible with this schema:\n\
{schema_json}\n\n\
{BASE_JSON_INSTRUCTION}"
    )
}

/// Extraction prompts per intent, with optional user overrides.
///
/// Overrides replace the whole prompt (schema included), which is what a
/// settings screen editing the prompt text produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<Intent, String>,
}

impl PromptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the prompt used for `intent`.
    pub fn with_override(mut self, intent: Intent, prompt: impl Into<String>) -> Self {
        self.overrides.insert(intent, prompt.into());
        self
    }

    /// Drop a previous override, restoring the default.
    pub fn reset(&mut self, intent: Intent) {
        self.overrides.remove(&intent);
    }

    pub fn is_overridden(&self, intent: Intent) -> bool {
        self.overrides.contains_key(&intent)
    }

    /// The prompt that will be sent for `intent`.
    pub fn prompt_for(&self, intent: Intent) -> &str {
        self.overrides
            .get(&intent)
            .map(String::as_str)
            .unwrap_or_else(|| extraction_prompt(intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_intent_embeds_schema_and_json_instruction() {
        for intent in Intent::ALL {
            let p = extraction_prompt(intent);
            assert!(p.contains(full_schema_json()), "{intent}: schema missing");
            assert!(p.contains(BASE_JSON_INSTRUCTION), "{intent}: instruction missing");
            assert!(p.starts_with(intent.template()));
        }
    }

    #[test]
    fn templates_differ_in_framing() {
        assert!(extraction_prompt(Intent::Informational).contains("analytical"));
        assert!(extraction_prompt(Intent::Selling).contains("persuasive"));
        assert!(extraction_prompt(Intent::ProjectWrapup).contains("retrospective"));
        assert_ne!(
            extraction_prompt(Intent::Selling),
            extraction_prompt(Intent::ProjectWrapup)
        );
    }

    #[test]
    fn extraction_prompt_is_deterministic() {
        let a = extraction_prompt_from_template(Intent::Selling.template());
        let b = extraction_prompt_from_template(Intent::Selling.template());
        assert_eq!(a, b);
        assert_eq!(a, extraction_prompt(Intent::Selling));
    }

    #[test]
    fn section_prompt_embeds_value_instruction_and_schema() {
        let current = json!({ "text": "A", "author": "B" });
        let p = section_prompt(SectionKey::Quote, &current, "make it punchier");

        assert!(p.contains("\"A\""));
        assert!(p.contains("\"B\""));
        assert!(p.contains("make it punchier"));
        let schema = serde_json::to_string_pretty(SectionKey::Quote.schema()).unwrap();
        assert!(p.contains(&schema));
        assert!(p.contains(BASE_JSON_INSTRUCTION));
        // Only the quote shape, not the full schema.
        assert!(!p.contains(full_schema_json()));
    }

    #[test]
    fn section_prompt_keeps_instruction_verbatim() {
        let instruction = "Use \"quotes\" and {braces} — keep it short";
        let p = section_prompt(SectionKey::Title, &json!("Old"), instruction);
        assert!(p.contains(instruction));
    }

    #[test]
    fn intent_parses_cli_spellings() {
        assert_eq!("selling".parse::<Intent>().unwrap(), Intent::Selling);
        assert_eq!("project-wrapup".parse::<Intent>().unwrap(), Intent::ProjectWrapup);
        assert_eq!("PROJECT_WRAPUP".parse::<Intent>().unwrap(), Intent::ProjectWrapup);
        assert!("poetry".parse::<Intent>().is_err());
    }

    #[test]
    fn intent_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_value(Intent::ProjectWrapup).unwrap(),
            json!("project_wrapup")
        );
    }

    #[test]
    fn prompt_set_overrides_and_resets() {
        let mut set = PromptSet::new().with_override(Intent::Selling, "custom");
        assert_eq!(set.prompt_for(Intent::Selling), "custom");
        assert_eq!(
            set.prompt_for(Intent::Informational),
            extraction_prompt(Intent::Informational)
        );
        assert!(set.is_overridden(Intent::Selling));

        set.reset(Intent::Selling);
        assert_eq!(set.prompt_for(Intent::Selling), extraction_prompt(Intent::Selling));
    }
}
