//! SurrealDB implementation of [`ResetTokenRepository`].
//!
//! Tokens are keyed by the hex SHA-256 digest of the raw token. They live
//! in the same store as users, so every service instance sees the same
//! state and a restart loses nothing.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::reset_token::{CreateResetToken, PasswordResetToken, RedeemedToken};
use authx_core::repository::ResetTokenRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, parse_uuid};

#[derive(Debug, SurrealValue)]
struct ResetTokenRow {
    tenant_id: String,
    user_id: String,
    expires_at: DateTime<Utc>,
    used: bool,
    used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ResetTokenRow {
    fn into_token(self, token_hash: &str) -> Result<PasswordResetToken, DbError> {
        Ok(PasswordResetToken {
            token_hash: token_hash.to_string(),
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            expires_at: self.expires_at,
            used: self.used,
            used_at: self.used_at,
            created_at: self.created_at,
        })
    }
}

/// Minimal projection used to count deleted rows.
#[derive(Debug, SurrealValue)]
struct DeletedRow {
    #[allow(dead_code)]
    tenant_id: String,
}

/// SurrealDB implementation of the password reset token store.
#[derive(Clone)]
pub struct SurrealResetTokenRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResetTokenRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn delete_one(&self, tenant_id: Uuid, token_hash: &str) -> AuthxResult<()> {
        self.db
            .query(
                "DELETE type::record('password_reset_token', $token_hash) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("token_hash", token_hash.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;
        Ok(())
    }
}

impl<C: Connection> ResetTokenRepository for SurrealResetTokenRepository<C> {
    async fn create(&self, input: CreateResetToken) -> AuthxResult<PasswordResetToken> {
        let result = self
            .db
            .query(
                "CREATE type::record('password_reset_token', $token_hash) SET \
                 tenant_id = $tenant_id, user_id = $user_id, \
                 expires_at = $expires_at, used = false",
            )
            .bind(("token_hash", input.token_hash.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, "password_reset_token"))?;

        let rows: Vec<ResetTokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("password_reset_token", "<new>"))?;

        Ok(row.into_token(&input.token_hash)?)
    }

    async fn get(&self, tenant_id: Uuid, token_hash: &str) -> AuthxResult<PasswordResetToken> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('password_reset_token', $token_hash) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("token_hash", token_hash.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetTokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            // The digest is the secret; never echo it into error text.
            .ok_or_else(|| DbError::not_found("password_reset_token", "<redacted>"))?;

        Ok(row.into_token(token_hash)?)
    }

    async fn redeem(
        &self,
        tenant_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthxResult<RedeemedToken> {
        // Check-and-invalidate in one conditional write. Only a caller
        // whose UPDATE matches the predicate gets the row back.
        let outcome = self
            .db
            .query(
                "UPDATE type::record('password_reset_token', $token_hash) \
                 SET used = true, used_at = $now \
                 WHERE tenant_id = $tenant_id \
                 AND used = false \
                 AND expires_at > $now",
            )
            .bind(("token_hash", token_hash.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("now", now))
            .await
            .and_then(|response| response.check());

        let write_error = match outcome {
            Ok(mut response) => {
                let rows: Vec<ResetTokenRow> = response.take(0).map_err(DbError::from)?;
                if let Some(row) = rows.into_iter().next() {
                    let token = row.into_token(token_hash)?;
                    return Ok(RedeemedToken {
                        tenant_id: token.tenant_id,
                        user_id: token.user_id,
                    });
                }
                None
            }
            // A concurrent redemption of the same record committed first
            // and this transaction lost the write conflict. The committed
            // state below decides the outcome.
            Err(err) => {
                warn!(%tenant_id, error = %err, "reset token redemption did not commit");
                Some(err)
            }
        };

        // The predicate did not match: work out why.
        let token = match self.get(tenant_id, token_hash).await {
            Ok(token) => token,
            Err(AuthxError::NotFound { .. }) => return Err(AuthxError::ResetTokenNotFound),
            Err(err) => return Err(err),
        };

        if token.used {
            return Err(AuthxError::ResetTokenAlreadyUsed);
        }

        if token.is_expired_at(now) {
            debug!(%tenant_id, user_id = %token.user_id, "Removing expired reset token");
            self.delete_one(tenant_id, token_hash).await?;
            return Err(AuthxError::ResetTokenExpired);
        }

        // Unused and live, yet the write did not apply.
        Err(match write_error {
            Some(err) => DbError::from(err).into(),
            None => AuthxError::Internal("reset token update did not apply".into()),
        })
    }

    async fn delete_unused_for_user(&self, tenant_id: Uuid, user_id: Uuid) -> AuthxResult<u64> {
        let mut result = self
            .db
            .query(
                "DELETE password_reset_token \
                 WHERE tenant_id = $tenant_id AND user_id = $user_id AND used = false \
                 RETURN BEFORE",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DeletedRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AuthxResult<u64> {
        let mut result = self
            .db
            .query(
                "DELETE password_reset_token \
                 WHERE expires_at <= $now OR used = true \
                 RETURN BEFORE",
            )
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DeletedRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }
}
