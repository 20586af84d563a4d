//! Prompt Relay: entry point.
//!
//! This binary serves a small browser UI and relays the prompts typed into it
//! to a hosted conversational-AI API, remembering the selected model, an
//! instruction and a temperature in a JSON settings file.
//!
//! # Usage
//!
//! ```text
//! prompt-relay [OPTIONS]
//!
//! Options:
//!   --bind         <IP>    Listener address          [default: 127.0.0.1]
//!   --port         <PORT>  Listener port             [default: 8000]
//!   --settings     <PATH>  JSON settings document    [default: cfg/config.json]
//!   --static-dir   <PATH>  UI asset directory        [default: static]
//!   --upstream-url <URL>   Provider base URL         [default: https://api.anthropic.com]
//!   --timeout      <SECS>  Upstream request deadline [default: 120]
//!   --config       <PATH>  Optional TOML server config
//! ```
//!
//! # Precedence
//!
//! For each setting: an explicit flag (or its `RELAY_*` environment
//! variable) wins, then the `--config` TOML file, then the built-in default.
//!
//! # Startup failures
//!
//! A missing or malformed settings document aborts startup with a non-zero
//! exit code.  There is no default credential or model to fall back to.
//!
//! # Reloading
//!
//! On Unix, `SIGHUP` re-reads the settings document without restarting.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use relay_web::application::{RelayService, SettingsStore};
use relay_web::domain::{ServerConfig, UpstreamConfig};
use relay_web::infrastructure::{
    load_file_config, run_server, FileConfig, HttpUpstreamClient, JsonSettingsFile,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Prompt Relay HTTP front-end.
///
/// Fields are `Option` so that a value given on the command line can be told
/// apart from one that should come from the TOML file or the defaults.
#[derive(Debug, Parser)]
#[command(
    name = "prompt-relay",
    about = "Browser front-end that relays prompts to a hosted conversational-AI API",
    version
)]
struct Cli {
    /// IP address to bind the HTTP listener to.
    ///
    /// `127.0.0.1` accepts only local connections; `0.0.0.0` accepts
    /// connections on every interface.  The relay does not authenticate
    /// callers, so widen this deliberately.
    #[arg(long, env = "RELAY_BIND")]
    bind: Option<String>,

    /// TCP port for the HTTP listener.
    #[arg(long, env = "RELAY_PORT")]
    port: Option<u16>,

    /// Path of the JSON settings document (`api_key`, `model`, ...).
    #[arg(long, env = "RELAY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Directory holding `index.html`, `app.js` and `style.css`.
    #[arg(long, env = "RELAY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Base URL of the upstream provider.
    #[arg(long, env = "RELAY_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Upstream request deadline in seconds.
    #[arg(long, env = "RELAY_TIMEOUT")]
    timeout: Option<u64>,

    /// Optional TOML file with `[server]` and `[upstream]` sections.
    #[arg(long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Reads the `--config` file, or returns all-defaults when none is given.
    fn file_config(&self) -> anyhow::Result<FileConfig> {
        match &self.config {
            Some(path) => load_file_config(path)
                .with_context(|| format!("failed to load server config {}", path.display())),
            None => Ok(FileConfig::default()),
        }
    }

    /// Merges the CLI arguments over `file` into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting bind address is not a valid IP.
    fn into_server_config(self, file: FileConfig) -> anyhow::Result<ServerConfig> {
        let bind = self.bind.unwrap_or(file.server.bind_address);
        let ip: IpAddr = bind
            .parse()
            .with_context(|| format!("invalid bind address: '{bind}'"))?;
        let port = self.port.unwrap_or(file.server.port);

        Ok(ServerConfig {
            bind_addr: SocketAddr::new(ip, port),
            settings_path: self.settings.unwrap_or(file.server.settings_path),
            static_dir: self.static_dir.unwrap_or(file.server.static_dir),
            upstream: UpstreamConfig {
                base_url: self.upstream_url.unwrap_or(file.upstream.base_url),
                timeout: Duration::from_secs(self.timeout.unwrap_or(file.upstream.timeout_secs)),
            },
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and the optional TOML file is read.
/// 2. `tracing_subscriber` is initialised; `RUST_LOG` wins over the file's
///    `log_level`.
/// 3. The settings document is loaded; failure aborts startup.
/// 4. The upstream client is built with the stored credential.
/// 5. On Unix, a `SIGHUP` listener is installed to reload the settings.
/// 6. [`run_server`] serves until Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = cli.file_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    let default_filter = file_config.server.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = cli.into_server_config(file_config)?;

    info!(
        "prompt relay starting: bind={}, settings={}, upstream={}",
        config.bind_addr,
        config.settings_path.display(),
        config.upstream.base_url
    );

    // ── Settings and upstream ─────────────────────────────────────────────────
    let repository = Arc::new(JsonSettingsFile::new(&config.settings_path));
    let store = SettingsStore::open(repository).await.with_context(|| {
        format!(
            "failed to load settings from {}",
            config.settings_path.display()
        )
    })?;
    let store = Arc::new(store);

    let api_key = store.snapshot().await.api_key;
    let upstream = HttpUpstreamClient::new(&config.upstream, &api_key)
        .context("failed to build upstream HTTP client")?;

    #[cfg(unix)]
    reload_on_hangup(Arc::clone(&store))?;

    let service = RelayService::new(store, Arc::new(upstream));

    // ── Main server loop ──────────────────────────────────────────────────────
    run_server(&config, service, shutdown_signal()).await?;

    info!("prompt relay stopped");
    Ok(())
}

/// Resolves on Ctrl+C (SIGINT on Unix).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C: initiating graceful shutdown"),
        Err(e) => {
            error!("failed to listen for Ctrl+C signal: {e}");
            // Without a signal handler there is nothing to wait for; keep serving.
            std::future::pending::<()>().await;
        }
    }
}

/// Re-reads the settings document every time the process receives `SIGHUP`.
///
/// # Errors
///
/// Returns an error if the signal handler cannot be installed.
#[cfg(unix)]
fn reload_on_hangup(store: Arc<SettingsStore>) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("received SIGHUP: reloading settings");
            if let Err(e) = store.reload().await {
                error!("settings reload failed, keeping current values: {e}");
            }
        }
    });
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: &[&str] = &[
        "RELAY_BIND",
        "RELAY_PORT",
        "RELAY_SETTINGS",
        "RELAY_STATIC_DIR",
        "RELAY_UPSTREAM_URL",
        "RELAY_TIMEOUT",
        "RELAY_CONFIG",
    ];

    /// Parses `args` as if no `RELAY_*` variable were set in the shell.
    fn cli(args: &[&str]) -> Cli {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        let mut argv = vec!["prompt-relay"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_produce_loopback_8000() {
        // Arrange / Act
        let config = cli(&[]).into_server_config(FileConfig::default()).unwrap();

        // Assert
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_defaults_produce_cfg_config_json() {
        let config = cli(&[]).into_server_config(FileConfig::default()).unwrap();
        assert_eq!(config.settings_path, PathBuf::from("cfg").join("config.json"));
    }

    #[test]
    fn test_defaults_produce_provider_base_url_and_timeout() {
        let config = cli(&[]).into_server_config(FileConfig::default()).unwrap();
        assert_eq!(config.upstream.base_url, "https://api.anthropic.com");
        assert_eq!(config.upstream.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_port_override() {
        let config = cli(&["--port", "9999"])
            .into_server_config(FileConfig::default())
            .unwrap();
        assert_eq!(config.bind_addr.port(), 9999);
    }

    #[test]
    fn test_settings_override() {
        let config = cli(&["--settings", "/tmp/relay.json"])
            .into_server_config(FileConfig::default())
            .unwrap();
        assert_eq!(config.settings_path, PathBuf::from("/tmp/relay.json"));
    }

    #[test]
    fn test_file_values_apply_when_flag_absent() {
        // Arrange
        let mut file = FileConfig::default();
        file.server.port = 7000;
        file.upstream.timeout_secs = 10;

        // Act
        let config = cli(&[]).into_server_config(file).unwrap();

        // Assert
        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_flag_wins_over_file_value() {
        let mut file = FileConfig::default();
        file.server.port = 7000;

        let config = cli(&["--port", "7001"]).into_server_config(file).unwrap();

        assert_eq!(config.bind_addr.port(), 7001);
    }

    #[test]
    fn test_invalid_bind_returns_error() {
        // Arrange: provide an invalid IP address string
        let result = cli(&["--bind", "not.an.ip"]).into_server_config(FileConfig::default());

        // Assert: must return an error, not panic
        assert!(result.is_err());
    }

    #[test]
    fn test_exported_variables_do_not_leak_into_defaults() {
        // Arrange: every variable cleared by the helper
        let parsed = cli(&[]);

        // Assert
        assert!(parsed.port.is_none());
        assert!(parsed.bind.is_none());
        assert!(parsed.settings.is_none());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let result = cli(&["--config", "/nonexistent/relay.toml"]).file_config();
        assert!(result.is_err());
    }
}
