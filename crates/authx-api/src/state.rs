//! Shared application state: the service graph over one database handle.

use std::ops::Deref;
use std::sync::Arc;

use authx_auth::{
    AccessGateway, AccountAuthService, AccountDirectory, AuthConfig, AuthError, LogDelivery,
    PasswordResetManager, TenantAuthService, TenantConfigStore, TenantRegistry, TokenCodec,
    UserDirectory,
};
use authx_db::repository::{
    SurrealAccountRepository, SurrealResetTokenRepository, SurrealTenantConfigRepository,
    SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

pub type Registry = TenantRegistry<SurrealTenantRepository<Any>>;
pub type ConfigStore = TenantConfigStore<SurrealTenantConfigRepository<Any>>;
pub type Gateway = AccessGateway<SurrealUserRepository<Any>, SurrealAccountRepository<Any>>;
pub type TenantAuth = TenantAuthService<
    SurrealTenantRepository<Any>,
    SurrealUserRepository<Any>,
    SurrealResetTokenRepository<Any>,
    LogDelivery,
>;
pub type AccountAuth = AccountAuthService<SurrealAccountRepository<Any>>;

pub struct Services {
    pub registry: Registry,
    pub configs: ConfigStore,
    pub gateway: Gateway,
    pub tenant_auth: TenantAuth,
    pub accounts: AccountAuth,
}

/// Cheaply cloneable handle to [`Services`], used as axum router state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Services>,
}

impl AppState {
    /// Wire the services over `db`. Fails only when the signing keys in
    /// `config` cannot be parsed.
    pub fn new(db: Surreal<Any>, config: &AuthConfig) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(config)?;

        let services = Services {
            registry: TenantRegistry::new(SurrealTenantRepository::new(db.clone())),
            configs: TenantConfigStore::new(SurrealTenantConfigRepository::new(db.clone())),
            gateway: AccessGateway::new(
                codec.clone(),
                SurrealUserRepository::new(db.clone()),
                SurrealAccountRepository::new(db.clone()),
            ),
            tenant_auth: TenantAuthService::new(
                SurrealTenantRepository::new(db.clone()),
                UserDirectory::new(SurrealUserRepository::new(db.clone()), config.pepper.clone()),
                PasswordResetManager::new(
                    SurrealResetTokenRepository::new(db.clone()),
                    config.reset_token_lifetime_secs,
                ),
                codec.clone(),
                LogDelivery,
            ),
            accounts: AccountAuthService::new(
                AccountDirectory::new(
                    SurrealAccountRepository::new(db),
                    config.pepper.clone(),
                    config.account_min_password_length,
                ),
                codec,
                config.account_token_lifetime_secs,
            ),
        };

        Ok(Self {
            inner: Arc::new(services),
        })
    }
}

impl Deref for AppState {
    type Target = Services;

    fn deref(&self) -> &Services {
        &self.inner
    }
}
