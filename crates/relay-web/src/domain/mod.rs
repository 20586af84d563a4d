//! Domain layer for relay-web.
//!
//! Plain data: the server's runtime configuration and the JSON bodies each
//! endpoint accepts and returns.  Nothing here reads files, opens sockets or
//! depends on axum.

pub mod config;
pub mod requests;

pub use config::{ServerConfig, UpstreamConfig};
pub use requests::{
    InstructionAck, ModelAck, ModelsResponse, PromptRequest, PromptResponse, PublicConfig,
    SetInstructionRequest, SetModelRequest, SetTemperatureRequest, TemperatureAck,
};
