//! Infrastructure layer for relay-web.
//!
//! All I/O lives here: the HTTP listener and its handlers, the outbound
//! client for the upstream provider, and the files on disk.
//!
//! # Responsibilities
//!
//! - Binding the listener and serving the router until shutdown
//! - Extracting typed bodies and mapping errors to HTTP responses
//! - Serving the browser UI from disk, or from the compiled-in copies
//! - Calling the provider with the credential and protocol headers
//! - Reading and atomically rewriting the JSON settings file
//! - Reading the optional TOML server configuration
//!
//! # What does NOT belong here?
//!
//! - Validation rules for settings values (that is `relay-core`)
//! - Deciding which settings a browser may see (that is the domain layer)

pub mod http;
pub mod storage;
pub mod upstream;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use http::{build_router, run_server};
pub use storage::server_config::{load_file_config, FileConfig};
pub use storage::settings_file::JsonSettingsFile;
pub use upstream::HttpUpstreamClient;
