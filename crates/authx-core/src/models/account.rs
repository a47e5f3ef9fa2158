//! Platform account domain model.
//!
//! Accounts are the developers who create and own tenants. They live in a
//! separate directory from tenant users and authenticate with tokens that
//! carry no tenant id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}
