//! Application-level error type.

use relay_core::SettingsUpdateError;
use thiserror::Error;

use crate::application::settings_store::SettingsError;
use crate::application::upstream::UpstreamError;

/// Everything a relay operation can fail with.
///
/// The first three variants are the caller's fault and are answered with
/// `400 {"success": false}`; the last two are server-side and carry a
/// machine-readable code.  The mapping lives in `infrastructure::http::error`.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A settings endpoint was called without its field.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The request body was not JSON, or a field had the wrong JSON type.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The field was present but its value was rejected.
    #[error(transparent)]
    InvalidUpdate(#[from] SettingsUpdateError),

    /// The settings document could not be written.
    #[error("failed to persist settings: {0}")]
    Persistence(#[from] SettingsError),

    /// The upstream provider call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
