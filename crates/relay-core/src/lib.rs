//! # relay-core
//!
//! Shared library for Prompt Relay containing the persisted settings record
//! and the upstream message protocol types.
//!
//! This crate has zero dependencies on sockets, files, or async runtimes.
//! Everything that touches the outside world lives in `relay-web`.
//!
//! # Architecture overview
//!
//! Prompt Relay is a small HTTP front-end that forwards a user's prompt to a
//! hosted conversational-AI API, remembering a few user-adjustable settings
//! (model, instruction, temperature) between requests.
//!
//! - **`domain`** – The [`Settings`] record, its documented defaults, and the
//!   validated single-field updates ([`SettingsUpdate`]) the HTTP layer may
//!   apply to it.
//!
//! - **`protocol`** – The JSON shapes exchanged with the upstream provider:
//!   the model listing, the messages request, and the response content
//!   blocks.  Also holds the two pure transformations the relay performs:
//!   prompt assembly and text extraction.

pub mod domain;
pub mod protocol;

pub use domain::settings::{Settings, SettingsUpdate, SettingsUpdateError};
pub use protocol::messages::{
    compose_prompt, CompletionRequest, MessagesRequest, MessagesResponse, ModelList,
};
