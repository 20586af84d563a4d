//! relay-web library crate.
//!
//! An HTTP front-end that lets a browser drive a hosted conversational-AI
//! API: pick a model, set an instruction and a temperature, submit a prompt,
//! read the reply.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over HTTP)
//!         ↕
//! [relay-web]
//!   ├── domain/           ServerConfig, typed request/response bodies
//!   ├── application/      SettingsStore, RelayService, upstream + storage ports
//!   └── infrastructure/
//!         ├── http/       axum router, handlers, error mapping, static UI
//!         ├── upstream/   reqwest client for the provider API
//!         └── storage/    JSON settings file, TOML server config
//!         ↕
//! Upstream provider (HTTPS)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no framework types.
//! - `application` depends on `domain` and `relay-core`; it reaches the
//!   outside world only through the [`application::UpstreamApi`] and
//!   [`application::SettingsRepository`] traits.
//! - `infrastructure` implements those traits and owns every socket and file.

/// Domain layer: configuration and HTTP body types (no I/O).
pub mod domain;

/// Application layer: settings ownership and prompt relaying.
pub mod application;

/// Infrastructure layer: HTTP server, upstream client, file storage.
pub mod infrastructure;
