//! Domain entities for Prompt Relay.
//!
//! Pure data and validation rules with no infrastructure dependencies.  The
//! settings file, the HTTP handlers, and the upstream client all depend on
//! these types; the types depend on none of them.

/// The persisted settings record.
///
/// See [`settings::Settings`] for the main type.
pub mod settings;
