//! AuthX Auth: token codec, password hashing and the multi-tenant
//! authentication services: tenant registry, configuration store, user
//! and account directories, password reset and the access gateway.

pub mod account;
pub mod config;
pub mod config_store;
pub mod delivery;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod password;
pub mod registry;
pub mod reset;
pub mod service;
pub mod token;

pub use account::{AccountDirectory, RegisterAccount};
pub use config::AuthConfig;
pub use config_store::TenantConfigStore;
pub use delivery::{LogDelivery, ResetTokenDelivery};
pub use directory::{RegisterUser, UserDirectory};
pub use error::{AuthError, TokenError};
pub use gateway::{AccessGateway, AccountIdentity, Identity};
pub use registry::{NewTenant, TenantRegistry};
pub use reset::{IssuedResetToken, PasswordResetManager};
pub use service::{AccountAuthService, AccountSession, TenantAuthService, UserSession};
pub use token::{IssuedToken, TokenClaims, TokenCodec};
