//! Port for the upstream conversational-AI provider.

use async_trait::async_trait;
use relay_core::CompletionRequest;
use thiserror::Error;

/// Boxed source error carried by [`UpstreamError::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ways an upstream call can fail.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request never produced an HTTP response (DNS, connect, TLS,
    /// timeout, or the body stream broke).
    #[error("upstream request failed: {0}")]
    Transport(#[source] BoxError),

    /// The provider answered with a non-success status.
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 2xx but the body was not the expected JSON.
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

/// The two calls the relay makes to the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Identifiers of the models the credential may use.
    async fn list_models(&self) -> Result<Vec<String>, UpstreamError>;

    /// Sends one single-turn completion and returns the concatenated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError>;
}
