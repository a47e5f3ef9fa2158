//! Error types for the AuthX system.

use thiserror::Error;

/// Errors surfaced by every AuthX layer.
///
/// Variants are stable kinds: callers (and the HTTP layer) distinguish
/// "wrong password" from "tenant not found" from "token expired" by
/// variant, never by message text.
#[derive(Debug, Error)]
pub enum AuthxError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    /// A valid credential was presented to a tenant it was not issued for.
    #[error("Token was not issued for this tenant")]
    TenantMismatch,

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A patch carried no applicable fields; nothing was written.
    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Reset token not found")]
    ResetTokenNotFound,

    #[error("Reset token has expired")]
    ResetTokenExpired,

    #[error("Reset token has already been used")]
    ResetTokenAlreadyUsed,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthxError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The generic credential failure. Used for both "no such user" and
    /// "wrong password" so responses cannot be used to enumerate emails.
    pub fn invalid_credentials() -> Self {
        Self::AuthenticationFailed {
            reason: "invalid credentials".into(),
        }
    }

    /// `true` for failures whose detail must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Crypto(_) | Self::Internal(_)
        )
    }
}

pub type AuthxResult<T> = Result<T, AuthxError>;
