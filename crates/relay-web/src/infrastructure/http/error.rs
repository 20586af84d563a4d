//! Mapping from [`RelayError`] to HTTP responses.
//!
//! | Error                          | Status | Body                                   |
//! |--------------------------------|--------|----------------------------------------|
//! | missing / malformed / invalid  | 400    | `{"success": false}`                   |
//! | persistence                    | 500    | `{"error": {"code": "persistence", …}}` |
//! | upstream transport             | 502    | `{"error": {"code": "upstream_unavailable", …}}` |
//! | upstream non-2xx               | 502    | `{"error": {"code": "upstream_status", …}}` |
//! | upstream undecodable body      | 502    | `{"error": {"code": "upstream_decode", …}}` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::application::{RelayError, UpstreamError};

/// Body of a rejected settings request.
#[derive(Debug, Clone, Serialize)]
pub struct Rejected {
    pub success: bool,
}

/// Body of a server-side failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl RelayError {
    /// Status and machine-readable code for a server-side failure, or `None`
    /// when the request itself was at fault.
    fn failure(&self) -> Option<(StatusCode, &'static str)> {
        let failure = match self {
            RelayError::MissingField(_) | RelayError::MalformedBody(_) | RelayError::InvalidUpdate(_) => {
                return None
            }
            RelayError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence"),
            RelayError::Upstream(UpstreamError::Transport(_)) => {
                (StatusCode::BAD_GATEWAY, "upstream_unavailable")
            }
            RelayError::Upstream(UpstreamError::Status { .. }) => {
                (StatusCode::BAD_GATEWAY, "upstream_status")
            }
            RelayError::Upstream(UpstreamError::Decode(_)) => {
                (StatusCode::BAD_GATEWAY, "upstream_decode")
            }
        };
        Some(failure)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let Some((status, code)) = self.failure() else {
            warn!("rejected request: {self}");
            return (StatusCode::BAD_REQUEST, Json(Rejected { success: false })).into_response();
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
