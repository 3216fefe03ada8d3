//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StoreError;

/// Errors surfaced to API clients.
///
/// Everything that is not a client mistake collapses into `Internal`: the
/// detail is logged, the client sees a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Convenience constructor for missing-field validation.
    pub fn missing_fields(fields: &str) -> Self {
        ApiError::BadRequest(format!("Missing required fields: {}", fields))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref detail) = self {
            tracing::error!(error = %detail, "request failed");
        }

        let body = json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::InvalidTransition { from, to } => ApiError::BadRequest(format!(
                "Job cannot move to '{}'. Current status: {}",
                to, from
            )),
            StoreError::NotPending { id, status } => ApiError::BadRequest(format!(
                "Dealership '{}' has already been decided. Current status: {}",
                id, status
            )),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::BadRequest("Invalid email or password".to_string())
            }
            AuthError::Hashing(detail) => ApiError::Internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobStatus;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::NotFound("Job j-1".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StoreError::InvalidTransition {
            from: JobStatus::Completed,
            to: JobStatus::Accepted,
        }
        .into();
        match err {
            ApiError::BadRequest(msg) => {
                assert!(msg.contains("COMPLETED"));
                assert!(msg.contains("ACCEPTED"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::Internal("sqlite exploded".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
