//! Ownership of the live settings record.
//!
//! [`SettingsStore`] holds the in-memory [`Settings`] behind a single
//! `tokio::sync::RwLock` and persists every change through a
//! [`SettingsRepository`] before publishing it.
//!
//! # Write path
//!
//! ```text
//! update(u)
//!   ├─ take the write lock          (one writer at a time: no lost updates)
//!   ├─ next = current.with_update(u) (validation; current untouched)
//!   ├─ repository.save(&next)        (whole document rewritten)
//!   └─ *current = next               (only after the save succeeded)
//! ```
//!
//! Readers take a cloned snapshot under the read lock and never observe a
//! record that is not on disk.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{Settings, SettingsUpdate};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::application::error::RelayError;

// ── Persistence port ──────────────────────────────────────────────────────────

/// Error type for settings document operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or lacks a required field.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be rendered as JSON.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves the whole settings document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Reads and parses the document.
    async fn load(&self) -> Result<Settings, SettingsError>;

    /// Replaces the document with `settings`.
    async fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// The process-wide settings record, injected into every handler.
pub struct SettingsStore {
    current: RwLock<Settings>,
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsStore {
    /// Loads the document once and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the document is missing or malformed.
    /// There is no fallback record: the caller is expected to abort startup.
    pub async fn open(repository: Arc<dyn SettingsRepository>) -> Result<Self, SettingsError> {
        let settings = repository.load().await?;
        info!(model = %settings.model, "settings loaded");
        Ok(Self {
            current: RwLock::new(settings),
            repository,
        })
    }

    /// A copy of the current record.
    pub async fn snapshot(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Validates, persists and publishes one field change.
    ///
    /// Returns the record as it is after the change.
    ///
    /// # Errors
    ///
    /// - [`RelayError::InvalidUpdate`] if the value fails validation; nothing
    ///   is written.
    /// - [`RelayError::Persistence`] if the document could not be saved; the
    ///   in-memory record keeps its previous value.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, RelayError> {
        let mut current = self.current.write().await;
        let next = current.with_update(&update)?;

        if let Err(e) = self.repository.save(&next).await {
            error!(field = update.field_name(), "failed to persist settings: {e}");
            return Err(e.into());
        }

        info!(field = update.field_name(), "settings updated");
        *current = next.clone();
        Ok(next)
    }

    /// Re-reads the document from disk and replaces the in-memory record.
    ///
    /// The upstream client keeps the credential it was built with, so a
    /// changed `api_key` is only logged; it takes effect after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the document can no longer be read; the
    /// in-memory record is kept.
    pub async fn reload(&self) -> Result<Settings, SettingsError> {
        let mut current = self.current.write().await;
        let loaded = self.repository.load().await?;
        if loaded.api_key != current.api_key {
            warn!("api_key changed on disk; restart to use the new credential");
        }
        info!(model = %loaded.model, "settings reloaded");
        *current = loaded.clone();
        Ok(loaded)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
