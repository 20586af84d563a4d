//! JSON-file persistence for the settings record.
//!
//! The document is rewritten in full, pretty-printed with two-space indents,
//! on every change:
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
//! # Atomic replacement
//!
//! A save writes the new document to a hidden sibling file and renames it
//! over the target.  `rename` within one directory is atomic on every
//! supported platform, so a crash mid-save leaves either the old or the new
//! document on disk, never a truncated one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use relay_core::Settings;
use tracing::debug;

use crate::application::settings_store::{SettingsError, SettingsRepository};

/// A settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `cfg/config.json` → `cfg/.config.json.tmp`
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| "settings".as_ref()));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsFile {
    async fn load(&self) -> Result<Settings, SettingsError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Self::io_error(dir, e))?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        let staging = self.staging_path();

        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| Self::io_error(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
