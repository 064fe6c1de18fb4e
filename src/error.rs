//! Gateway error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures surfaced by the token manager and verse retrieval.
///
/// The variants keep "we cannot authenticate to upstream" apart from
/// "upstream is unavailable" and from "the caller sent bad input".
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Client-credentials exchange failed (bad credentials, transport error, malformed grant).
    #[error("upstream authentication failed: {0}")]
    Authentication(String),

    /// Content API returned a non-success status or the transport failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Verse reference is not `<chapter>:<verse>`.
    #[error("invalid verse reference '{0}', expected <chapter>:<verse>")]
    InvalidReference(String),

    /// Request parameter outside its accepted range.
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Authentication(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidReference(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "upstream_authentication_failed",
            Self::Upstream(_) => "upstream_unavailable",
            Self::InvalidReference(_) => "invalid_reference",
            Self::InvalidInput(_) => "bad_request",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Authentication(msg) => tracing::error!(error = %msg, "upstream authentication failure"),
            Self::Upstream(msg) => tracing::warn!(error = %msg, "upstream failure"),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
