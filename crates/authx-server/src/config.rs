//! Server configuration, read from `AUTHX_*` environment variables.

use std::net::SocketAddr;

use authx_auth::AuthConfig;
use authx_auth::config::MAX_TOKEN_LIFETIME_SECS;
use authx_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0} (or {0}_FILE)")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// How often expired and used reset tokens are purged. `0` disables it.
    pub reset_purge_interval_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_defaults = DbConfig::default();
        let auth_defaults = AuthConfig::default();

        let bind_addr = match lookup("AUTHX_BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                key: "AUTHX_BIND_ADDR",
                reason: format!("{e}"),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let log_format = match lookup("AUTHX_LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "AUTHX_LOG_FORMAT",
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                });
            }
        };

        let db = DbConfig {
            url: lookup("AUTHX_DB_URL").unwrap_or(db_defaults.url),
            namespace: lookup("AUTHX_DB_NAMESPACE").unwrap_or(db_defaults.namespace),
            database: lookup("AUTHX_DB_DATABASE").unwrap_or(db_defaults.database),
            username: lookup("AUTHX_DB_USERNAME"),
            password: lookup("AUTHX_DB_PASSWORD"),
        };

        let auth = AuthConfig {
            jwt_private_key_pem: pem(&lookup, "AUTHX_JWT_PRIVATE_KEY_PEM")?,
            jwt_public_key_pem: pem(&lookup, "AUTHX_JWT_PUBLIC_KEY_PEM")?,
            jwt_issuer: lookup("AUTHX_JWT_ISSUER").unwrap_or(auth_defaults.jwt_issuer),
            account_token_lifetime_secs: lifetime(
                &lookup,
                "AUTHX_ACCOUNT_TOKEN_TTL_SECS",
                auth_defaults.account_token_lifetime_secs,
            )?,
            reset_token_lifetime_secs: lifetime(
                &lookup,
                "AUTHX_RESET_TOKEN_TTL_SECS",
                auth_defaults.reset_token_lifetime_secs,
            )?,
            pepper: lookup("AUTHX_PASSWORD_PEPPER").filter(|p| !p.is_empty()),
            account_min_password_length: auth_defaults.account_min_password_length,
        };

        Ok(Self {
            bind_addr,
            log_format,
            db,
            auth,
            reset_purge_interval_secs: number(&lookup, "AUTHX_RESET_PURGE_INTERVAL_SECS", 3600)?,
        })
    }
}

/// A PEM key given inline as `KEY` or as a path in `KEY_FILE`.
fn pem<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(inline) = lookup(key).filter(|v| !v.trim().is_empty()) {
        return Ok(inline);
    }
    match lookup(&format!("{key}_FILE")) {
        Some(path) => {
            std::fs::read_to_string(&path).map_err(|source| ConfigError::File { path, source })
        }
        None => Err(ConfigError::Missing(key)),
    }
}

fn number<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("{e}"),
        }),
        None => Ok(default),
    }
}

/// A token lifetime in seconds, between 1 and [`MAX_TOKEN_LIFETIME_SECS`].
fn lifetime<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = number(lookup, key, default)?;
    if secs == 0 || secs > MAX_TOKEN_LIFETIME_SECS {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be between 1 and {MAX_TOKEN_LIFETIME_SECS} seconds"),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 2] = [
        ("AUTHX_JWT_PRIVATE_KEY_PEM", "private"),
        ("AUTHX_JWT_PUBLIC_KEY_PEM", "public"),
    ];

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let config = ServerConfig::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.db.url, "mem://");
        assert_eq!(config.auth.jwt_private_key_pem, "private");
        assert_eq!(config.auth.reset_token_lifetime_secs, 900);
        assert_eq!(config.auth.pepper, None);
        assert_eq!(config.reset_purge_interval_secs, 3600);
    }

    #[test]
    fn missing_signing_key_is_fatal() {
        let err = ServerConfig::from_lookup(lookup(&[KEYS[1]])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTHX_JWT_PRIVATE_KEY_PEM")));
    }

    #[test]
    fn unreadable_key_file_is_reported() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("AUTHX_JWT_PRIVATE_KEY_PEM_FILE", "/nonexistent/authx/key.pem"),
            KEYS[1],
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("AUTHX_BIND_ADDR", "127.0.0.1:9000"),
            ("AUTHX_LOG_FORMAT", "pretty"),
            ("AUTHX_DB_URL", "ws://db:8000"),
            ("AUTHX_RESET_TOKEN_TTL_SECS", "600"),
            ("AUTHX_PASSWORD_PEPPER", "pepper"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.db.url, "ws://db:8000");
        assert_eq!(config.auth.reset_token_lifetime_secs, 600);
        assert_eq!(config.auth.pepper.as_deref(), Some("pepper"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("AUTHX_RESET_TOKEN_TTL_SECS", "fifteen minutes"));
        let err = ServerConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "AUTHX_RESET_TOKEN_TTL_SECS",
                ..
            }
        ));
    }

    #[test]
    fn token_lifetimes_are_bounded() {
        for (key, value) in [
            ("AUTHX_RESET_TOKEN_TTL_SECS", "0"),
            ("AUTHX_RESET_TOKEN_TTL_SECS", "18446744073709551615"),
            ("AUTHX_ACCOUNT_TOKEN_TTL_SECS", "9223372036854775807"),
        ] {
            let mut pairs = KEYS.to_vec();
            pairs.push((key, value));
            let err = ServerConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: k, .. } if k == key),
                "accepted {key}={value}"
            );
        }

        let max = MAX_TOKEN_LIFETIME_SECS.to_string();
        let mut pairs = KEYS.to_vec();
        pairs.push(("AUTHX_ACCOUNT_TOKEN_TTL_SECS", &max));
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.auth.account_token_lifetime_secs, MAX_TOKEN_LIFETIME_SECS);
    }
}
