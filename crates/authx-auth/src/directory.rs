//! Tenant-scoped user directory.
//!
//! Every operation takes the tenant id first: a user id or an email alone
//! never identifies a user.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::tenant_config::PasswordPolicy;
use authx_core::models::user::{CreateUser, User};
use authx_core::repository::{PaginatedResult, Pagination, UserRepository};
use tracing::{debug, info};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::AuthError;
use crate::password;

/// Signup input for a tenant user.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
}

pub struct UserDirectory<U: UserRepository> {
    repo: U,
    pepper: Option<String>,
}

impl<U: UserRepository> UserDirectory<U> {
    pub fn new(repo: U, pepper: Option<String>) -> Self {
        Self { repo, pepper }
    }

    /// Register a user inside `tenant_id`.
    ///
    /// Fails with `Validation` on a malformed email or a password that
    /// breaks `policy`, and with `AlreadyExists` when the email is taken
    /// within this tenant.
    pub async fn register(
        &self,
        tenant_id: Uuid,
        input: RegisterUser,
        policy: &PasswordPolicy,
    ) -> AuthxResult<User> {
        let email = valid_email(&input.email)?;
        password::check_policy(&input.password, policy)?;
        let username = input
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let password_hash =
            password::hash_password_async(&input.password, self.pepper.as_deref()).await?;
        let user = self
            .repo
            .create(CreateUser {
                tenant_id,
                email,
                username,
                password_hash,
            })
            .await?;

        info!(tenant_id = %tenant_id, user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check an email/password pair inside `tenant_id`.
    ///
    /// Unknown email and wrong password produce the same error and cost
    /// one Argon2 verification each.
    pub async fn authenticate(
        &self,
        tenant_id: Uuid,
        email: &str,
        password: &str,
    ) -> AuthxResult<User> {
        let pepper = self.pepper.as_deref();
        let user = match self.repo.get_by_email(tenant_id, &normalize_email(email)).await {
            Ok(user) => user,
            Err(AuthxError::NotFound { .. }) => {
                password::equalize_timing_async(password, pepper).await;
                debug!(tenant_id = %tenant_id, "login for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !password::verify_password_async(password, &user.password_hash, pepper).await? {
            debug!(tenant_id = %tenant_id, user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(user)
    }

    pub async fn find_by_id(&self, tenant_id: Uuid, user_id: Uuid) -> AuthxResult<User> {
        self.repo.get_by_id(tenant_id, user_id).await
    }

    pub async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> AuthxResult<User> {
        self.repo
            .get_by_email(tenant_id, &normalize_email(email))
            .await
    }

    pub async fn list_all(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> AuthxResult<PaginatedResult<User>> {
        self.repo.list(tenant_id, pagination).await
    }

    /// Re-hash and overwrite the password. Bearer tokens already issued
    /// stay valid until they expire.
    pub async fn update_password(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        new_password: &str,
        policy: &PasswordPolicy,
    ) -> AuthxResult<()> {
        password::check_policy(new_password, policy)?;
        let hash = password::hash_password_async(new_password, self.pepper.as_deref()).await?;
        self.repo.set_password_hash(tenant_id, user_id, hash).await?;
        info!(tenant_id = %tenant_id, user_id = %user_id, "password updated");
        Ok(())
    }

    /// Authenticated password change: `current` must verify first.
    pub async fn change_password(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        current: &str,
        new_password: &str,
        policy: &PasswordPolicy,
    ) -> AuthxResult<()> {
        let user = self.repo.get_by_id(tenant_id, user_id).await?;
        let pepper = self.pepper.as_deref();
        if !password::verify_password_async(current, &user.password_hash, pepper).await? {
            return Err(AuthError::InvalidCredentials.into());
        }
        self.update_password(tenant_id, user_id, new_password, policy)
            .await
    }
}

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize and syntactically validate an email address.
pub(crate) fn valid_email(raw: &str) -> AuthxResult<String> {
    let email = normalize_email(raw);
    if !email.validate_email() {
        return Err(AuthxError::validation("invalid email address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn rejects_syntactically_invalid_email() {
        for raw in ["", "alice", "alice@", "@example.com", "a b@example.com"] {
            assert!(valid_email(raw).is_err(), "accepted {raw:?}");
        }
        assert_eq!(valid_email(" Bob@Example.com").unwrap(), "bob@example.com");
    }
}
