//! Authentication configuration.

use chrono::Duration;

/// Upper bound for any configured token lifetime (one year).
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 3600;

/// Configuration for the authentication services.
///
/// Loaded once at startup; nothing here changes at runtime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for bearer token signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for bearer token verification.
    pub jwt_public_key_pem: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Lifetime of platform account tokens in seconds (default: 3600).
    /// Tenant user tokens use the tenant's configured session duration.
    pub account_token_lifetime_secs: u64,
    /// Password reset token lifetime in seconds (default: 900 = 15 minutes).
    pub reset_token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
    /// Minimum password length for platform accounts.
    pub account_min_password_length: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            jwt_issuer: "authx".into(),
            account_token_lifetime_secs: 3600,
            reset_token_lifetime_secs: 900,
            pepper: None,
            account_min_password_length: 8,
        }
    }
}

/// A token lifetime in seconds as a `Duration`, capped at
/// [`MAX_TOKEN_LIFETIME_SECS`].
pub(crate) fn lifetime(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TOKEN_LIFETIME_SECS) as i64)
}
