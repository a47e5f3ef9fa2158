//! Tenant-scoped user domain model.
//!
//! A user exists only inside its tenant: the same email may be registered
//! under two tenants as two unrelated rows. Every lookup is keyed by
//! `(tenant_id, id)` or `(tenant_id, email)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Normalized (trimmed, lower-cased) email.
    pub email: String,
    pub username: Option<String>,
    /// Argon2id PHC string. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub tenant_id: Uuid,
    pub email: String,
    pub username: Option<String>,
    /// Already-hashed password; repositories never see plaintext.
    pub password_hash: String,
}
