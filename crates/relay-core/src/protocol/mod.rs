//! Protocol module containing the upstream provider's message types.

pub mod messages;

pub use messages::*;
