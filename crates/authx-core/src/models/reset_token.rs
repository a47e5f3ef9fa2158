//! Password reset token domain model.
//!
//! Only the SHA-256 digest of a reset token is persisted; the raw value
//! leaves the process exclusively through the delivery channel.
//!
//! Lifecycle: `Issued -> Redeemed` (terminal) or `Issued -> Expired`
//! (terminal, evaluated at redemption time).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetToken {
    /// Hex SHA-256 digest of the raw token; the record key.
    pub token_hash: String,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Expiry is exclusive: a token is dead at `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct CreateResetToken {
    pub token_hash: String,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemedToken {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
}
