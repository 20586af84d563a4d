//! JSON bodies of the browser-facing HTTP API.
//!
//! Every request body models its fields as `Option` so that "key absent" is
//! visible to the handler.  Presence, not truthiness, is what the settings
//! endpoints check: `{"instruction": ""}` is a valid request, `{}` is not.
//!
//! ```text
//! GET  /models           →  ModelsResponse     { models, selected }
//! POST /set_model        ←  SetModelRequest    →  ModelAck
//! POST /set_instruction  ←  SetInstructionRequest → InstructionAck
//! POST /set_temperature  ←  SetTemperatureRequest → TemperatureAck
//! POST /prompt           ←  PromptRequest      →  PromptResponse { content }
//! GET  /config           →  PublicConfig       { instruction, temperature }
//! ```
//!
//! Rejected settings requests answer `{"success": false}`; that body is built
//! by the HTTP error mapping rather than modelled here.

use relay_core::{Settings, SettingsUpdate};
use serde::{Deserialize, Serialize};

// ── Requests ──────────────────────────────────────────────────────────────────

/// Body of `POST /set_model`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetModelRequest {
    pub model: Option<String>,
}

/// Body of `POST /set_instruction`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetInstructionRequest {
    pub instruction: Option<String>,
}

/// Body of `POST /set_temperature`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetTemperatureRequest {
    pub temperature: Option<f64>,
}

/// Body of `POST /prompt`.  A missing `prompt` is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

impl SetModelRequest {
    /// The update this request asks for, or `None` when `model` is absent.
    pub fn into_update(self) -> Option<SettingsUpdate> {
        self.model.map(SettingsUpdate::Model)
    }
}

impl SetInstructionRequest {
    /// The update this request asks for, or `None` when `instruction` is absent.
    pub fn into_update(self) -> Option<SettingsUpdate> {
        self.instruction.map(SettingsUpdate::Instruction)
    }
}

impl SetTemperatureRequest {
    /// The update this request asks for, or `None` when `temperature` is absent.
    pub fn into_update(self) -> Option<SettingsUpdate> {
        self.temperature.map(SettingsUpdate::Temperature)
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Body of `GET /models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub selected: String,
}

/// Successful `POST /set_model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAck {
    pub success: bool,
    pub model: String,
}

/// Successful `POST /set_instruction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionAck {
    pub success: bool,
    pub instruction: String,
}

/// Successful `POST /set_temperature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureAck {
    pub success: bool,
    pub temperature: f64,
}

/// Body of `POST /prompt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub content: String,
}

/// Body of `GET /config`: the settings a browser may see.
///
/// Deliberately has no credential field, so no code path can leak one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicConfig {
    pub instruction: String,
    pub temperature: f64,
}

impl From<&Settings> for PublicConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            instruction: settings.instruction().to_string(),
            temperature: settings.temperature(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
