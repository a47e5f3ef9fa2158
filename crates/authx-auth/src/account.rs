//! Platform account directory.
//!
//! Accounts own tenants. They are a bounded context of their own: a
//! separate table, a separate email namespace and tenant-less tokens.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::account::{Account, CreateAccount};
use authx_core::models::tenant_config::PasswordPolicy;
use authx_core::repository::AccountRepository;
use tracing::info;
use uuid::Uuid;

use crate::directory::{normalize_email, valid_email};
use crate::error::AuthError;
use crate::password;

#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub struct AccountDirectory<A: AccountRepository> {
    repo: A,
    pepper: Option<String>,
    policy: PasswordPolicy,
}

impl<A: AccountRepository> AccountDirectory<A> {
    pub fn new(repo: A, pepper: Option<String>, min_password_length: u32) -> Self {
        Self {
            repo,
            pepper,
            policy: PasswordPolicy {
                min_length: min_password_length,
            },
        }
    }

    pub async fn register(&self, input: RegisterAccount) -> AuthxResult<Account> {
        let email = valid_email(&input.email)?;
        password::check_policy(&input.password, &self.policy)?;
        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let password_hash =
            password::hash_password_async(&input.password, self.pepper.as_deref()).await?;
        let account = self
            .repo
            .create(CreateAccount {
                email,
                name,
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    /// Same failure shape and cost for unknown email and wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthxResult<Account> {
        let pepper = self.pepper.as_deref();
        let account = match self.repo.get_by_email(&normalize_email(email)).await {
            Ok(account) => account,
            Err(AuthxError::NotFound { .. }) => {
                password::equalize_timing_async(password, pepper).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !password::verify_password_async(password, &account.password_hash, pepper).await? {
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(account)
    }

    pub async fn find_by_id(&self, account_id: Uuid) -> AuthxResult<Account> {
        self.repo.get_by_id(account_id).await
    }
}
