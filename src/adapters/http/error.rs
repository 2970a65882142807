//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Error body: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// Request failure mapped to a status code and `{error}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationFailed(msg) => Self::BadRequest(msg),
            DomainError::ProjectNotFound(id) => Self::NotFound(format!("Project not found: {id}")),
            DomainError::ExperimentNotFound(id) => Self::NotFound(format!("Experiment not found: {id}")),
            other if other.is_store_error() => {
                tracing::error!(error = %other, "store read failed");
                Self::Internal("Failed to load project data".to_string())
            }
            other => {
                tracing::error!(error = %other, "unexpected pipeline error");
                Self::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        let not_found: ApiError = DomainError::ProjectNotFound("p9".into()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let store: ApiError = DomainError::DatabaseError("connection refused to db.internal".into()).into();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.to_string(), "Failed to load project data");

        let invalid: ApiError = DomainError::ValidationFailed("bad".into()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
