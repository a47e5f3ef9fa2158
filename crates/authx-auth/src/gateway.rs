//! Access control gateway.
//!
//! Sits in front of every identity-bearing endpoint. It turns a bearer
//! token into a caller identity bound to one tenant (or to a platform
//! account) and answers ownership questions. Tokens are never exchangeable
//! across tenants, even when their signature is valid.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::repository::{AccountRepository, UserRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::AuthError;
use crate::token::TokenCodec;

/// A tenant user, authenticated for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
}

/// An authenticated platform account (tenant owner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountIdentity {
    pub account_id: Uuid,
    pub email: String,
}

pub struct AccessGateway<U: UserRepository, A: AccountRepository> {
    codec: TokenCodec,
    users: U,
    accounts: A,
}

impl<U: UserRepository, A: AccountRepository> AccessGateway<U, A> {
    pub fn new(codec: TokenCodec, users: U, accounts: A) -> Self {
        Self {
            codec,
            users,
            accounts,
        }
    }

    pub async fn authenticate_request(
        &self,
        tenant_id: Uuid,
        bearer: Option<&str>,
    ) -> AuthxResult<Identity> {
        self.authenticate_request_at(tenant_id, bearer, Utc::now())
            .await
    }

    /// Resolve the caller of an endpoint scoped to `tenant_id`.
    ///
    /// Missing, malformed, forged or expired tokens fail with
    /// `AuthenticationFailed`. A valid token minted for a different tenant,
    /// or a platform account token, fails with `TenantMismatch`. The user
    /// the token names must still exist.
    pub async fn authenticate_request_at(
        &self,
        tenant_id: Uuid,
        bearer: Option<&str>,
        now: DateTime<Utc>,
    ) -> AuthxResult<Identity> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let claims = self.codec.verify_at(token, now)?;

        match claims.tenant()? {
            Some(issued_for) if issued_for == tenant_id => {}
            issued_for => {
                warn!(
                    tenant_id = %tenant_id,
                    issued_for = ?issued_for,
                    "bearer token presented to a foreign tenant"
                );
                return Err(AuthError::TenantMismatch.into());
            }
        }

        let user_id = claims.subject()?;
        let user = match self.users.get_by_id(tenant_id, user_id).await {
            Ok(user) => user,
            Err(AuthxError::NotFound { .. }) => {
                return Err(AuthxError::AuthenticationFailed {
                    reason: "token subject no longer exists".into(),
                });
            }
            Err(e) => return Err(e),
        };

        Ok(Identity {
            tenant_id,
            user_id: user.id,
            email: user.email,
        })
    }

    pub async fn authenticate_account(&self, bearer: Option<&str>) -> AuthxResult<AccountIdentity> {
        self.authenticate_account_at(bearer, Utc::now()).await
    }

    /// Resolve a platform account caller. Tenant-scoped tokens are refused.
    pub async fn authenticate_account_at(
        &self,
        bearer: Option<&str>,
        now: DateTime<Utc>,
    ) -> AuthxResult<AccountIdentity> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let claims = self.codec.verify_at(token, now)?;
        if claims.tenant()?.is_some() {
            return Err(AuthxError::AuthenticationFailed {
                reason: "not an account token".into(),
            });
        }

        let account = match self.accounts.get_by_id(claims.subject()?).await {
            Ok(account) => account,
            Err(AuthxError::NotFound { .. }) => {
                return Err(AuthxError::AuthenticationFailed {
                    reason: "token subject no longer exists".into(),
                });
            }
            Err(e) => return Err(e),
        };

        Ok(AccountIdentity {
            account_id: account.id,
            email: account.email,
        })
    }
}

/// Allow only the account that owns a resource.
pub fn authorize_ownership(owner_id: Uuid, caller_id: Uuid) -> AuthxResult<()> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(AuthxError::AuthorizationDenied {
            reason: "caller does not own this resource".into(),
        })
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` value.
/// The scheme is case-insensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
