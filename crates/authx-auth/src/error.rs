//! Authentication error types.

use authx_core::error::AuthxError;
use thiserror::Error;

/// Bearer token verification failures.
///
/// Attacker-controlled input only ever produces one of these; it never
/// panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("token was not issued for this tenant")]
    TenantMismatch,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AuthxError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AuthxError::invalid_credentials(),
            AuthError::MissingToken | AuthError::Token(_) => AuthxError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::TenantMismatch => AuthxError::TenantMismatch,
            AuthError::Crypto(msg) => AuthxError::Crypto(msg),
        }
    }
}

impl From<TokenError> for AuthxError {
    fn from(err: TokenError) -> Self {
        AuthError::Token(err).into()
    }
}
