//! The persisted settings record.
//!
//! [`Settings`] mirrors the JSON document stored on disk:
//!
//! ```json
//! {
//!   "api_key": "sk-...",
//!   "model": "claude-3-5-haiku-latest",
//!   "instruction": "be terse",
//!   "temperature": 0.7
//! }
//! ```
//!
//! `api_key` and `model` are required; every other field is optional and
//! falls back to a documented default when read.  Keys this version does not
//! know about are kept in [`Settings::extra`] and written back untouched, so
//! hand-edited additions survive a settings change made through the UI.
//!
//! # Updates
//!
//! The HTTP layer never mutates a `Settings` directly.  It builds a
//! [`SettingsUpdate`] and asks for a *new* record via
//! [`Settings::with_update`].  Keeping the old record intact until the new
//! one has been persisted means a failed disk write leaves the in-memory
//! state unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Instruction used when the record has none.
pub const DEFAULT_INSTRUCTION: &str = "";

/// Sampling temperature used when the record has none.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Completion length cap used when the record has none.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

// ── Error type ────────────────────────────────────────────────────────────────

/// A single-field update was rejected before touching the record.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsUpdateError {
    /// `model` was present but empty.
    #[error("model identifier must not be empty")]
    EmptyModel,
}

// ── Settings record ───────────────────────────────────────────────────────────

/// The user-adjustable configuration shared by every request.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential forwarded to the upstream provider.  Never returned to
    /// browsers and never printed by [`fmt::Debug`].
    pub api_key: String,

    /// Model identifier sent with every completion request.
    pub model: String,

    /// Text prepended (with a newline) to every prompt when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    /// Sampling temperature forwarded to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Upper bound on generated tokens per completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Keys present in the file that this version does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Creates a record holding only the two required fields.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            instruction: None,
            temperature: None,
            max_tokens: None,
            extra: Map::new(),
        }
    }

    /// The stored instruction, or [`DEFAULT_INSTRUCTION`].
    pub fn instruction(&self) -> &str {
        self.instruction.as_deref().unwrap_or(DEFAULT_INSTRUCTION)
    }

    /// The stored temperature, or [`DEFAULT_TEMPERATURE`].
    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// The stored completion cap, or [`DEFAULT_MAX_TOKENS`].
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Returns a copy of this record with `update` applied.
    ///
    /// `self` is left untouched, so the caller decides when (and whether) the
    /// new record replaces the current one.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsUpdateError`] if the update fails validation.
    pub fn with_update(&self, update: &SettingsUpdate) -> Result<Self, SettingsUpdateError> {
        update.validate()?;

        let mut next = self.clone();
        match update {
            SettingsUpdate::Model(model) => next.model = model.clone(),
            SettingsUpdate::Instruction(instruction) => {
                next.instruction = Some(instruction.clone())
            }
            SettingsUpdate::Temperature(temperature) => next.temperature = Some(*temperature),
        }
        Ok(next)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("instruction", &self.instruction)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("extra", &self.extra)
            .finish()
    }
}

// ── Single-field updates ──────────────────────────────────────────────────────

/// One user-initiated change to the settings record.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    /// Select a different model.  Must be non-empty.
    Model(String),
    /// Replace the instruction.  The empty string is a valid value and
    /// disables prepending.
    Instruction(String),
    /// Replace the sampling temperature.  Stored and forwarded as given; the
    /// provider is the one that enforces its accepted range.
    Temperature(f64),
}

impl SettingsUpdate {
    /// The settings-file key this update writes.
    pub fn field_name(&self) -> &'static str {
        match self {
            SettingsUpdate::Model(_) => "model",
            SettingsUpdate::Instruction(_) => "instruction",
            SettingsUpdate::Temperature(_) => "temperature",
        }
    }

    /// Checks the update's value against the field's rules.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsUpdateError::EmptyModel`] for `Model("")`.
    pub fn validate(&self) -> Result<(), SettingsUpdateError> {
        match self {
            SettingsUpdate::Model(model) if model.is_empty() => Err(SettingsUpdateError::EmptyModel),
            _ => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
