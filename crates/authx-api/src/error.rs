//! Error → HTTP response mapping.
//!
//! Every error body is `{ "error": <code>, "message": <text> }`. Codes are
//! stable; storage and crypto failures are logged here and rendered as an
//! opaque `internal_error`.

use authx_core::error::AuthxError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct ApiError(pub AuthxError);

impl From<AuthxError> for ApiError {
    fn from(err: AuthxError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AuthxError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AuthxError::validation(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AuthxError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AuthxError::AlreadyExists { .. } => (StatusCode::CONFLICT, "conflict"),
            AuthxError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "unauthenticated")
            }
            AuthxError::AuthorizationDenied { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            AuthxError::TenantMismatch => (StatusCode::FORBIDDEN, "tenant_mismatch"),
            AuthxError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AuthxError::NoFieldsToUpdate => (StatusCode::BAD_REQUEST, "no_fields_to_update"),
            AuthxError::ResetTokenNotFound => (StatusCode::BAD_REQUEST, "token_not_found"),
            AuthxError::ResetTokenExpired => (StatusCode::BAD_REQUEST, "token_expired"),
            AuthxError::ResetTokenAlreadyUsed => (StatusCode::BAD_REQUEST, "token_already_used"),
            AuthxError::Database(_) | AuthxError::Crypto(_) | AuthxError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if self.0.is_internal() {
            error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}
