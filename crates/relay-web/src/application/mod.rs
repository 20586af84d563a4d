//! Application layer for relay-web.
//!
//! The application layer knows *what* the relay does (own the settings
//! record, turn a prompt into a completion) but delegates *how* to reach the
//! disk and the network to the infrastructure layer, through two ports:
//!
//! - [`SettingsRepository`]: load and persist the settings document.
//! - [`UpstreamApi`]: list models and request completions.
//!
//! # What does NOT belong here?
//!
//! - axum types, status codes, or response bodies (that is `infrastructure::http`)
//! - reqwest or file-system calls

pub mod error;
pub mod relay_service;
pub mod settings_store;
pub mod upstream;

pub use error::RelayError;
pub use relay_service::RelayService;
pub use settings_store::{SettingsError, SettingsRepository, SettingsStore};
pub use upstream::{UpstreamApi, UpstreamError};
