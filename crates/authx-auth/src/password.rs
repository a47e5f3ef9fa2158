//! Password hashing and verification using Argon2id.
//!
//! Hashing uses OWASP-recommended parameters (memory: 19 MiB,
//! iterations: 2, parallelism: 1) with a fresh random salt per hash. An
//! optional pepper (server-side secret) is prepended to the password.

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::tenant_config::PasswordPolicy;

use crate::error::AuthError;

/// Hash verified when the account being logged into does not exist, so
/// that "unknown email" costs the same as "wrong password".
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("authx-timing-equalizer", None).ok());

fn peppered<'a>(password: &'a str, pepper: Option<&str>, buf: &'a mut String) -> &'a [u8] {
    match pepper {
        Some(p) => {
            *buf = format!("{p}{password}");
            buf.as_bytes()
        }
        None => password.as_bytes(),
    }
}

/// Hash a password with Argon2id.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut buf = String::new();
    let input = peppered(password, pepper, &mut buf);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AuthError::Crypto)` if the stored hash is malformed. The
/// comparison inside `argon2` is constant-time.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> Result<bool, AuthError> {
    let mut buf = String::new();
    let input = peppered(password, pepper, &mut buf);

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Burn one verification's worth of work for a login whose account does
/// not exist. The result is discarded.
pub fn equalize_timing(password: &str, pepper: Option<&str>) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash, pepper);
    }
}

// Async variants run Argon2 on the blocking pool, off the runtime workers.

async fn off_runtime<T, F>(work: F) -> AuthxResult<T>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthxError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(AuthxError::from)
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_async(password: &str, pepper: Option<&str>) -> AuthxResult<String> {
    let password = password.to_owned();
    let pepper = pepper.map(str::to_owned);
    off_runtime(move || hash_password(&password, pepper.as_deref())).await
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_async(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> AuthxResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let pepper = pepper.map(str::to_owned);
    off_runtime(move || verify_password(&password, &hash, pepper.as_deref())).await
}

/// [`equalize_timing`] on the blocking thread pool.
pub async fn equalize_timing_async(password: &str, pepper: Option<&str>) {
    let password = password.to_owned();
    let pepper = pepper.map(str::to_owned);
    let _ = off_runtime(move || {
        equalize_timing(&password, pepper.as_deref());
        Ok(())
    })
    .await;
}

/// Enforce the password policy: never empty, at least `min_length`
/// characters.
pub fn check_policy(password: &str, policy: &PasswordPolicy) -> AuthxResult<()> {
    if password.is_empty() {
        return Err(AuthxError::validation("password must not be empty"));
    }
    if password.chars().count() < policy.min_length as usize {
        return Err(AuthxError::validation(format!(
            "password must be at least {} characters",
            policy.min_length
        )));
    }
    Ok(())
}
