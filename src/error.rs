use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::helpers::qr_generator::QrGenerateError;

/// Failures surfaced at the HTTP boundary. Validation and lookup failures
/// carry their message to the client; everything else collapses to a
/// generic 500 so raw error text never leaves the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request payload")]
    Validation(Vec<(&'static str, &'static str)>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("failed to encode QR image: {0}")]
    Encoding(#[from] QrGenerateError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(field_errors) => {
                let mut errors = serde_json::Map::new();
                for (field, message) in field_errors {
                    errors.insert(field.to_string(), json!([message]));
                }
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Encoding(e) => {
                warn!("Failed to encode a QR image due to: {}", e);
                internal_server_error()
            }
            ApiError::Internal(e) => {
                warn!("Unhandled error while serving a request: {}", e);
                internal_server_error()
            }
        }
    }
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::Validation(vec![("spot_id", "This field is required.")]);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::NotFound("No reservation found for this email at this spot.".into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let err = ApiError::Unauthorized("Incorrect password. Cancellation denied.".into());
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_maps_to_500() {
        let err = ApiError::Internal(anyhow!("connection pool exhausted"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
