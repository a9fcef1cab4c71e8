//! Chat-completion request bodies.
//!
//! The wire shape is OpenAI's chat-completions format as accepted by
//! OpenRouter:
//!
//! ```json
//! {
//!   "model": "google/gemini-2.5-flash",
//!   "messages": [
//!     { "role": "system", "content": "<prompt>" },
//!     { "role": "user", "content": [
//!         { "type": "image_url", "image_url": { "url": "data:application/pdf;base64,..." } },
//!         { "type": "text", "text": "Analyze this document ..." }
//!     ] }
//!   ],
//!   "response_format": { "type": "json_object" }
//! }
//! ```

use crate::prompts::{EXTRACTION_USER_TEXT, REVISION_USER_TEXT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Message content: a plain string, or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// User turn carrying an inline file followed by an instruction.
    pub fn user_with_file(data_uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_uri.into(),
                    },
                },
                ContentPart::Text { text: text.into() },
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

/// Request for a whole-document extraction.
pub fn extraction_request(model: &str, system_prompt: &str, data_uri: String) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user_with_file(data_uri, EXTRACTION_USER_TEXT),
        ],
        response_format: ResponseFormat::json_object(),
    }
}

/// Request for a single-section revision. No document is attached.
pub fn revision_request(model: &str, system_prompt: String) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(REVISION_USER_TEXT),
        ],
        response_format: ResponseFormat::json_object(),
    }
}
