//! Request extractors for bearer credentials and path ids.

use authx_auth::AccountIdentity;
use authx_auth::gateway::bearer_token;
use authx_core::error::AuthxError;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// The credential from the `Authorization` header, if any.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

/// An authenticated platform account.
pub struct AccountCaller(pub AccountIdentity);

impl FromRequestParts<AppState> for AccountCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let identity = state
            .gateway
            .authenticate_account(bearer(&parts.headers))
            .await?;
        Ok(Self(identity))
    }
}

/// Parse a tenant id from the path. Anything that is not a UUID names no
/// tenant.
pub fn tenant_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| AuthxError::not_found("tenant", raw).into())
}
