//! Upstream provider message types.
//!
//! The relay talks to the Anthropic Messages API (version `2023-06-01`):
//!
//! ```text
//! GET  {base}/v1/models    → { "data": [ { "id": "..." }, ... ] }
//! POST {base}/v1/messages  ← { "model", "max_tokens", "temperature",
//!                              "messages": [ { "role": "user", "content": "..." } ] }
//!                          → { "content": [ { "type": "text", "text": "..." }, ... ] }
//! ```
//!
//! Only the fields the relay reads are modelled.  Everything else in a
//! response is ignored, and absent collections decode as empty.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::settings::Settings;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Provider base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Value of the protocol-version header sent on every request.
pub const API_VERSION: &str = "2023-06-01";

/// Header carrying the credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying [`API_VERSION`].
pub const API_VERSION_HEADER: &str = "anthropic-version";

/// Path of the model-listing endpoint.
pub const MODELS_PATH: &str = "/v1/models";

/// Path of the completion endpoint.
pub const MESSAGES_PATH: &str = "/v1/messages";

// ── Prompt assembly ───────────────────────────────────────────────────────────

/// Joins the instruction and the user's prompt into one message body.
///
/// A non-empty instruction is prepended with a single `\n` separator; an
/// empty instruction leaves the prompt untouched.
///
/// ```rust
/// use relay_core::compose_prompt;
///
/// assert_eq!(compose_prompt("be terse", "hello"), "be terse\nhello");
/// assert_eq!(compose_prompt("", "hello"), "hello");
/// ```
pub fn compose_prompt(instruction: &str, prompt: &str) -> String {
    if instruction.is_empty() {
        prompt.to_string()
    } else {
        format!("{instruction}\n{prompt}")
    }
}

// ── Model listing ─────────────────────────────────────────────────────────────

/// Response body of `GET /v1/models`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

/// One entry of [`ModelList::data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

impl ModelList {
    /// Model identifiers in provider order.
    pub fn into_ids(self) -> Vec<String> {
        self.data.into_iter().map(|m| m.id).collect()
    }
}

// ── Completion request ────────────────────────────────────────────────────────

/// Speaker of a [`ChatMessage`].  The relay only ever sends user turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// One entry of [`MessagesRequest::messages`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub messages: Vec<ChatMessage>,
}

/// Everything needed for one completion, independent of wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub instruction: Option<String>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Builds a request for `prompt` from the current settings, resolving
    /// every optional setting to its effective value.
    pub fn from_settings(settings: &Settings, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: settings.model.clone(),
            temperature: Some(settings.temperature()),
            instruction: Some(settings.instruction().to_string()),
            max_tokens: Some(settings.max_tokens()),
        }
    }

    /// The exact text sent as the single user message.
    pub fn full_prompt(&self) -> String {
        compose_prompt(self.instruction.as_deref().unwrap_or_default(), &self.prompt)
    }

    /// Converts into the provider's wire request.
    pub fn into_messages_request(self) -> MessagesRequest {
        let content = self.full_prompt();
        MessagesRequest {
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: Role::User,
                content,
            }],
        }
    }
}

// ── Completion response ───────────────────────────────────────────────────────

/// One entry of [`MessagesResponse::content`].
///
/// Non-text blocks (tool use, images) carry no `text` and are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body of `POST /v1/messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// `None` when `content` is absent or is not an array.
    #[serde(default, deserialize_with = "content_collection")]
    pub content: Option<Vec<ContentBlock>>,
}

/// Reads `content` leniently: anything but an array counts as no collection,
/// and array entries that are not content blocks are dropped.
fn content_collection<'de, D>(deserializer: D) -> Result<Option<Vec<ContentBlock>>, D::Error>
where
    D: Deserializer<'de>,
{
    let blocks = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    };
    Ok(blocks)
}

impl MessagesResponse {
    /// Concatenates the text of every content block, in order.
    ///
    /// Returns an empty string when the response has no content collection.
    pub fn text(&self) -> String {
        let Some(blocks) = &self.content else {
            tracing::debug!("upstream response carried no content collection");
            return String::new();
        };
        blocks.iter().filter_map(|b| b.text.as_deref()).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
