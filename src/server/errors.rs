//! Error-to-response mapping for route handlers

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::StacCacheError;

/// Wrapper that renders a [`StacCacheError`] as a JSON error response.
///
/// Invalid input is the caller's fault (400), upstream failures are the
/// catalog's fault (502), everything else is ours (500). The body is
/// always `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub StacCacheError);

impl IntoResponse for ApiError {
    #[inline]
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StacCacheError::InvalidInput(message) => {
                debug!("Rejected request: {}", message);
                StatusCode::BAD_REQUEST
            }
            StacCacheError::Upstream(message) => {
                warn!("Upstream failure: {}", message);
                StatusCode::BAD_GATEWAY
            }
            other => {
                error!("Internal error: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<StacCacheError> for ApiError {
    #[inline]
    fn from(err: StacCacheError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for ApiError {
    #[inline]
    fn from(err: anyhow::Error) -> Self {
        Self(StacCacheError::Other(err))
    }
}
