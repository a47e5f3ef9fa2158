//! Password reset token manager.
//!
//! Raw tokens are 256-bit random strings handed out once; storage only
//! ever sees their SHA-256 digest. Redemption is a single atomic
//! check-and-invalidate in the repository.

use std::fmt;

use authx_core::error::AuthxResult;
use authx_core::models::reset_token::{CreateResetToken, RedeemedToken};
use authx_core::repository::ResetTokenRepository;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{config, token};

/// A freshly issued reset token. The raw value is redacted from `Debug`.
#[derive(Clone)]
pub struct IssuedResetToken {
    pub raw: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedResetToken")
            .field("raw", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct PasswordResetManager<R: ResetTokenRepository> {
    repo: R,
    ttl: Duration,
}

impl<R: ResetTokenRepository> PasswordResetManager<R> {
    pub fn new(repo: R, ttl_secs: u64) -> Self {
        Self {
            repo,
            ttl: config::lifetime(ttl_secs),
        }
    }

    pub async fn issue(&self, tenant_id: Uuid, user_id: Uuid) -> AuthxResult<IssuedResetToken> {
        self.issue_at(tenant_id, user_id, Utc::now()).await
    }

    /// Issue a token for `user_id`, superseding any unused ones.
    pub async fn issue_at(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AuthxResult<IssuedResetToken> {
        let superseded = self.repo.delete_unused_for_user(tenant_id, user_id).await?;
        if superseded > 0 {
            debug!(
                tenant_id = %tenant_id,
                user_id = %user_id,
                superseded,
                "dropped older reset tokens"
            );
        }

        let raw = token::generate_secret();
        let expires_at = now + self.ttl;
        self.repo
            .create(CreateResetToken {
                token_hash: token::hash_token(&raw),
                tenant_id,
                user_id,
                expires_at,
            })
            .await?;

        info!(tenant_id = %tenant_id, user_id = %user_id, %expires_at, "reset token issued");
        Ok(IssuedResetToken { raw, expires_at })
    }

    pub async fn redeem(&self, tenant_id: Uuid, raw: &str) -> AuthxResult<RedeemedToken> {
        self.redeem_at(tenant_id, raw, Utc::now()).await
    }

    /// Consume a token presented to `tenant_id`.
    ///
    /// Fails with `ResetTokenNotFound`, `ResetTokenExpired` or
    /// `ResetTokenAlreadyUsed`. A token issued under another tenant is
    /// reported as not found.
    pub async fn redeem_at(
        &self,
        tenant_id: Uuid,
        raw: &str,
        now: DateTime<Utc>,
    ) -> AuthxResult<RedeemedToken> {
        let redeemed = self
            .repo
            .redeem(tenant_id, &token::hash_token(raw), now)
            .await?;
        info!(tenant_id = %tenant_id, user_id = %redeemed.user_id, "reset token redeemed");
        Ok(redeemed)
    }

    /// Remove every unused token `user_id` still holds.
    pub async fn revoke_all(&self, tenant_id: Uuid, user_id: Uuid) -> AuthxResult<u64> {
        self.repo.delete_unused_for_user(tenant_id, user_id).await
    }

    pub async fn purge_expired(&self) -> AuthxResult<u64> {
        self.purge_expired_at(Utc::now()).await
    }

    /// Delete tokens that are used or expired at `now`.
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> AuthxResult<u64> {
        let purged = self.repo.purge_expired(now).await?;
        if purged > 0 {
            info!(purged, "purged stale reset tokens");
        }
        Ok(purged)
    }
}
