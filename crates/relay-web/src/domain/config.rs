//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings
//! that are *not* user-adjustable through the UI: where to listen, where the
//! settings file and static assets live, and how to reach the upstream
//! provider.  It is built once in `main.rs` (from CLI flags, environment
//! variables and an optional TOML file) and never changes afterwards.
//!
//! The user-adjustable values (model, instruction, temperature) live in the
//! settings file instead; see [`relay_core::Settings`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use relay_core::protocol::messages::DEFAULT_BASE_URL;

/// All runtime configuration for the relay server.
///
/// # Example
///
/// ```rust
/// use relay_web::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8000);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    ///
    /// Defaults to loopback: the relay has no caller authentication, so
    /// exposing it on a LAN interface is an explicit operator choice.
    pub bind_addr: SocketAddr,

    /// Path of the JSON settings file (`api_key`, `model`, ...).
    pub settings_path: PathBuf,

    /// Directory holding `index.html`, `app.js` and `style.css`.
    ///
    /// Files missing from this directory are served from the copies
    /// compiled into the binary.
    pub static_dir: PathBuf,

    /// How to reach the upstream provider.
    pub upstream: UpstreamConfig,
}

/// Connection settings for the upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// Scheme + host (+ optional port) without a trailing path, e.g.
    /// `https://api.anthropic.com`.
    pub base_url: String,

    /// Overall deadline for one upstream request, connect through body.
    pub timeout: Duration,
}

impl Default for ServerConfig {
    /// | Field          | Default            |
    /// |----------------|--------------------|
    /// | bind_addr      | `127.0.0.1:8000`   |
    /// | settings_path  | `cfg/config.json`  |
    /// | static_dir     | `static`           |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            settings_path: PathBuf::from("cfg").join("config.json"),
            static_dir: PathBuf::from("static"),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
