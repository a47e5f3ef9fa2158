//! Tenant and account authentication flows.
//!
//! Composes the directory, reset manager and token codec into the
//! operations exposed over HTTP: signup, login, forgot/reset password,
//! change password and "who am I".

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::account::Account;
use authx_core::models::tenant::Tenant;
use authx_core::models::tenant_config::AuthMethod;
use authx_core::models::user::User;
use authx_core::repository::{
    AccountRepository, ResetTokenRepository, TenantRepository, UserRepository,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::account::{AccountDirectory, RegisterAccount};
use crate::config;
use crate::delivery::ResetTokenDelivery;
use crate::directory::{RegisterUser, UserDirectory};
use crate::gateway::Identity;
use crate::password;
use crate::reset::PasswordResetManager;
use crate::token::{IssuedToken, TokenCodec};

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub user: User,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// An account together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSession {
    pub account: Account,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication flows inside a tenant.
///
/// Generic over repository implementations so that the auth layer has no
/// dependency on the database crate.
pub struct TenantAuthService<T, U, R, D>
where
    T: TenantRepository,
    U: UserRepository,
    R: ResetTokenRepository,
    D: ResetTokenDelivery,
{
    tenants: T,
    directory: UserDirectory<U>,
    resets: PasswordResetManager<R>,
    codec: TokenCodec,
    delivery: D,
}

impl<T, U, R, D> TenantAuthService<T, U, R, D>
where
    T: TenantRepository,
    U: UserRepository,
    R: ResetTokenRepository,
    D: ResetTokenDelivery,
{
    pub fn new(
        tenants: T,
        directory: UserDirectory<U>,
        resets: PasswordResetManager<R>,
        codec: TokenCodec,
        delivery: D,
    ) -> Self {
        Self {
            tenants,
            directory,
            resets,
            codec,
            delivery,
        }
    }

    pub fn directory(&self) -> &UserDirectory<U> {
        &self.directory
    }

    pub fn resets(&self) -> &PasswordResetManager<R> {
        &self.resets
    }

    /// Register a user in `tenant_id` and sign them in.
    pub async fn signup(&self, tenant_id: Uuid, input: RegisterUser) -> AuthxResult<UserSession> {
        let tenant = self.password_tenant(tenant_id).await?;
        let user = self
            .directory
            .register(tenant_id, input, &tenant.config.auth.password_policy())
            .await?;
        self.session(&tenant, user)
    }

    pub async fn login(
        &self,
        tenant_id: Uuid,
        email: &str,
        password: &str,
    ) -> AuthxResult<UserSession> {
        let tenant = self.password_tenant(tenant_id).await?;
        let user = self.directory.authenticate(tenant_id, email, password).await?;
        info!(tenant_id = %tenant_id, user_id = %user.id, "user logged in");
        self.session(&tenant, user)
    }

    /// Start a password reset.
    ///
    /// Succeeds whether or not the email is registered, and never returns
    /// the token: it goes to the delivery channel only.
    pub async fn forgot_password(&self, tenant_id: Uuid, email: &str) -> AuthxResult<()> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        let user = match self.directory.find_by_email(tenant_id, email).await {
            Ok(user) => user,
            Err(AuthxError::NotFound { .. }) => {
                debug!(tenant_id = %tenant_id, "password reset requested for unknown email");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let issued = self.resets.issue(tenant_id, user.id).await?;
        self.delivery.deliver(&tenant, &user, &issued).await
    }

    /// Finish a password reset with a raw token from the delivery channel.
    ///
    /// The new password is checked against the tenant policy before the
    /// token is consumed, so a rejected password does not burn the token.
    pub async fn reset_password(
        &self,
        tenant_id: Uuid,
        raw_token: &str,
        new_password: &str,
    ) -> AuthxResult<()> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        let policy = tenant.config.auth.password_policy();
        password::check_policy(new_password, &policy)?;

        let redeemed = self.resets.redeem(tenant_id, raw_token).await?;
        self.directory
            .update_password(tenant_id, redeemed.user_id, new_password, &policy)
            .await?;
        self.resets.revoke_all(tenant_id, redeemed.user_id).await?;
        Ok(())
    }

    pub async fn me(&self, identity: &Identity) -> AuthxResult<User> {
        self.directory
            .find_by_id(identity.tenant_id, identity.user_id)
            .await
    }

    pub async fn change_password(
        &self,
        identity: &Identity,
        current: &str,
        new_password: &str,
    ) -> AuthxResult<()> {
        let tenant = self.tenants.get_by_id(identity.tenant_id).await?;
        self.directory
            .change_password(
                identity.tenant_id,
                identity.user_id,
                current,
                new_password,
                &tenant.config.auth.password_policy(),
            )
            .await
    }

    /// Load the tenant and make sure password sign-in is enabled for it.
    async fn password_tenant(&self, tenant_id: Uuid) -> AuthxResult<Tenant> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        if !tenant.config.auth.is_enabled(AuthMethod::Password) {
            return Err(AuthxError::validation(
                "password sign-in is not enabled for this app",
            ));
        }
        Ok(tenant)
    }

    fn session(&self, tenant: &Tenant, user: User) -> AuthxResult<UserSession> {
        let ttl = config::lifetime(tenant.config.auth.session_duration_secs);
        let IssuedToken { token, expires_at } =
            self.codec.issue_tenant_token(tenant.id, user.id, &user.email, ttl)?;
        Ok(UserSession {
            user,
            access_token: token,
            expires_at,
        })
    }
}

/// Signup and login for platform accounts.
pub struct AccountAuthService<A: AccountRepository> {
    directory: AccountDirectory<A>,
    codec: TokenCodec,
    ttl: Duration,
}

impl<A: AccountRepository> AccountAuthService<A> {
    pub fn new(directory: AccountDirectory<A>, codec: TokenCodec, ttl_secs: u64) -> Self {
        Self {
            directory,
            codec,
            ttl: config::lifetime(ttl_secs),
        }
    }

    pub async fn signup(&self, input: RegisterAccount) -> AuthxResult<AccountSession> {
        let account = self.directory.register(input).await?;
        self.session(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthxResult<AccountSession> {
        let account = self.directory.authenticate(email, password).await?;
        info!(account_id = %account.id, "account logged in");
        self.session(account)
    }

    pub async fn find_by_id(&self, account_id: Uuid) -> AuthxResult<Account> {
        self.directory.find_by_id(account_id).await
    }

    fn session(&self, account: Account) -> AuthxResult<AccountSession> {
        let IssuedToken { token, expires_at } =
            self.codec.issue_account_token(account.id, &account.email, self.ttl)?;
        Ok(AccountSession {
            account,
            access_token: token,
            expires_at,
        })
    }
}
