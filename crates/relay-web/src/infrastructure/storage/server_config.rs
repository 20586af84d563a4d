//! Optional TOML file with operator-owned server settings.
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! port = 8080
//! settings_path = "/etc/prompt-relay/config.json"
//! static_dir = "/usr/share/prompt-relay/static"
//! log_level = "debug"
//!
//! [upstream]
//! base_url = "https://api.anthropic.com"
//! timeout_secs = 60
//! ```
//!
//! Every key is optional.  Fields annotated with `#[serde(default = "...")]`
//! fall back to the same values as the CLI defaults, so an empty file (or no
//! file at all) behaves exactly like plain `prompt-relay`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for server configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
}

/// Listener, paths and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the JSON settings document.
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
    /// Directory holding the browser UI assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// How to reach the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_settings_path() -> PathBuf {
    PathBuf::from("cfg").join("config.json")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_url() -> String {
    relay_core::protocol::messages::DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            settings_path: default_settings_path(),
            static_dir: default_static_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Reads and parses the file at `path`.
///
/// Unlike the settings document, a missing server config file is an error:
/// it is only read when the operator names it explicitly.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServerConfig;

    #[test]
    fn test_empty_file_matches_server_config_defaults() {
        // Arrange
        let defaults = ServerConfig::default();

        // Act
        let cfg: FileConfig = toml::from_str("").expect("empty TOML is valid");

        // Assert
        assert_eq!(cfg.server.port, defaults.bind_addr.port());
        assert_eq!(cfg.server.bind_address, defaults.bind_addr.ip().to_string());
        assert_eq!(cfg.server.settings_path, defaults.settings_path);
        assert_eq!(cfg.server.static_dir, defaults.static_dir);
        assert_eq!(cfg.upstream.base_url, defaults.upstream.base_url);
        assert_eq!(cfg.upstream.timeout_secs, defaults.upstream.timeout.as_secs());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let toml_str = r#"
[server]
port = 9999
[upstream]
timeout_secs = 5
"#;

        let cfg: FileConfig = toml::from_str(toml_str).expect("deserialize partial");

        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.server.log_level, "info");
        assert_eq!(cfg.upstream.timeout_secs, 5);
        assert_eq!(cfg.upstream.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let result: Result<FileConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file_config_reads_from_disk() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(&path, "[server]\nlog_level = \"debug\"\n").unwrap();

        // Act
        let cfg = load_file_config(&path).expect("load");

        // Assert
        assert_eq!(cfg.server.log_level, "debug");
    }

    #[test]
    fn test_load_file_config_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
