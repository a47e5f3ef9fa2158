//! SurrealDB repository implementations.

use surrealdb_types::SurrealValue;

mod account;
mod reset_token;
mod tenant;
mod tenant_config;
mod user;

pub use account::SurrealAccountRepository;
pub use reset_token::SurrealResetTokenRepository;
pub use tenant::SurrealTenantRepository;
pub use tenant_config::SurrealTenantConfigRepository;
pub use user::SurrealUserRepository;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}
