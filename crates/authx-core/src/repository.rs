//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation; there is no
//! lookup by user id alone.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AuthxResult;
use crate::models::{
    account::{Account, CreateAccount},
    reset_token::{CreateResetToken, PasswordResetToken, RedeemedToken},
    tenant::{CreateTenant, Tenant, TenantSummary, UpdateTenant},
    tenant_config::{TenantConfig, TenantConfigPatch},
    user::{CreateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Platform scope
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the email is taken.
    fn create(&self, input: CreateAccount) -> impl Future<Output = AuthxResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AuthxResult<Account>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = AuthxResult<Account>> + Send;
}

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = AuthxResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AuthxResult<Tenant>> + Send;
    /// Secret-free listing of the tenants an account owns.
    fn list_by_owner(
        &self,
        owner_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AuthxResult<PaginatedResult<TenantSummary>>> + Send;
    /// Applies the present fields in one write. Callers reject empty
    /// patches before reaching storage.
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = AuthxResult<Tenant>> + Send;
    /// Atomically overwrites the stored secret.
    fn set_secret(&self, id: Uuid, secret: String)
    -> impl Future<Output = AuthxResult<()>> + Send;
    /// Deletes the tenant together with its users and reset tokens.
    fn delete(&self, id: Uuid) -> impl Future<Output = AuthxResult<()>> + Send;
}

pub trait TenantConfigRepository: Send + Sync {
    fn get(&self, tenant_id: Uuid) -> impl Future<Output = AuthxResult<TenantConfig>> + Send;
    /// Deep-merges the present patch fields into the stored document.
    fn merge(
        &self,
        tenant_id: Uuid,
        patch: TenantConfigPatch,
    ) -> impl Future<Output = AuthxResult<TenantConfig>> + Send;
    /// Replaces the whole document.
    fn replace(
        &self,
        tenant_id: Uuid,
        config: TenantConfig,
    ) -> impl Future<Output = AuthxResult<TenantConfig>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when `(tenant_id, email)` is taken.
    fn create(&self, input: CreateUser) -> impl Future<Output = AuthxResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AuthxResult<User>> + Send;
    fn get_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> impl Future<Output = AuthxResult<User>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AuthxResult<PaginatedResult<User>>> + Send;
    fn set_password_hash(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = AuthxResult<()>> + Send;
}

pub trait ResetTokenRepository: Send + Sync {
    fn create(
        &self,
        input: CreateResetToken,
    ) -> impl Future<Output = AuthxResult<PasswordResetToken>> + Send;
    /// Looks a token up inside its tenant. A digest stored under another
    /// tenant is reported as `NotFound`.
    fn get(
        &self,
        tenant_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = AuthxResult<PasswordResetToken>> + Send;
    /// Single atomic check-and-invalidate.
    ///
    /// Marks the token used only if it belongs to `tenant_id`, is unused
    /// and has not expired at `now`. Exactly one of any number of
    /// concurrent calls for the same token succeeds; the others fail with
    /// `ResetTokenAlreadyUsed`. Other failures are `ResetTokenNotFound`
    /// and `ResetTokenExpired`.
    fn redeem(
        &self,
        tenant_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = AuthxResult<RedeemedToken>> + Send;
    /// Removes every unused token of one user; redeemed tokens stay as
    /// tombstones until purged. Returns the number removed.
    fn delete_unused_for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AuthxResult<u64>> + Send;
    /// Housekeeping: removes tokens that are expired at `now` or used.
    fn purge_expired(&self, now: DateTime<Utc>) -> impl Future<Output = AuthxResult<u64>> + Send;
}
