//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting domain and storage errors to HTTP responses.

use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_shared::{AuthError, PatientError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Auth(err) => {
                let (status, code) = match err {
                    AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
                    AuthError::DuplicateUsername => (StatusCode::CONFLICT, "DUPLICATE_USERNAME"),
                    AuthError::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
                };
                (status, code, err.to_string())
            }
            ApiError::Patient(err) => {
                let (status, code) = match err {
                    PatientError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    PatientError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "INVALID_FIELD"),
                    PatientError::DuplicateRecord => (StatusCode::BAD_REQUEST, "DUPLICATE_RECORD"),
                };
                (status, code, err.to_string())
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Storage(StoreError::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "The datastore is temporarily unavailable".to_string(),
            ),
            ApiError::Storage(StoreError::UniqueViolation(_)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "The resource already exists".to_string(),
            ),
            ApiError::Storage(StoreError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        match &self {
            ApiError::Storage(StoreError::Unavailable(err)) => warn!("Storage unavailable: {}", err),
            ApiError::Storage(err) => error!("Storage error: {:?}", err),
            ApiError::Internal(err) => error!("Internal error: {:?}", err),
            _ => {}
        }

        let field = match &self {
            ApiError::Patient(err) => err.field().map(str::to_string),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_invalid_token_is_unauthorized() {
        let response = ApiError::from(AuthError::InvalidToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_duplicate_username_is_conflict() {
        assert_eq!(
            ApiError::from(AuthError::DuplicateUsername).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_patient_errors_status() {
        assert_eq!(ApiError::from(PatientError::NotFound(1)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(PatientError::DuplicateRecord).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PatientError::invalid_field("name", "bad")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_storage_unavailable_is_503() {
        let err = ApiError::from(StoreError::Unavailable("pool timed out".to_string()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_domain_message_surfaced_verbatim() {
        let response = ApiError::from(PatientError::NotFound(999)).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Patient with ID 999 not found.");
        assert!(body["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn test_invalid_field_names_the_field() {
        let err = PatientError::invalid_field("gender", "The gender must be one of the following: Masculino, Feminino.");
        let body = body_json(ApiError::from(err).into_response()).await;
        assert_eq!(body["error"]["field"], "gender");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = ApiError::from(anyhow::anyhow!("secret connection string"));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
