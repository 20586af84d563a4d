//! Storage infrastructure: configuration file persistence.
//!
//! - `settings_file`: the user-adjustable JSON settings document, read at
//!   startup and rewritten on every change.
//! - `server_config`: the optional, operator-owned TOML file with listener
//!   and upstream settings.  Read once, never written.

pub mod server_config;
pub mod settings_file;
