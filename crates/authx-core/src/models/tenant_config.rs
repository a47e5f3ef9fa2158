//! Per-tenant configuration document.
//!
//! A tenant owns exactly one configuration, stored inline on the tenant
//! record. It has three top-level sections: branding, auth and oauth.
//! Updates are partial ([`TenantConfigPatch`]); a reset restores
//! [`TenantConfig::default`] wholesale.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BRAND_NAME: &str = "My App";
pub const DEFAULT_PRIMARY_COLOR: &str = "#4F46E5";
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 3600;
/// Upper bound for `auth.session_duration_secs` (30 days).
pub const MAX_SESSION_DURATION_SECS: u64 = 30 * 24 * 3600;
pub const DEFAULT_MIN_PASSWORD_LENGTH: u32 = 8;
/// Upper bound for `auth.min_password_length`.
pub const MAX_MIN_PASSWORD_LENGTH: u32 = 1024;
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantConfig {
    pub branding: Branding,
    pub auth: AuthSettings,
    pub oauth: OAuthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branding {
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub description: Option<String>,
}

/// Sign-in methods a tenant can enable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Password,
    MagicLink,
    #[serde(rename = "oauth")]
    OAuth,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSettings {
    pub methods: Vec<AuthMethod>,
    /// Lifetime of bearer tokens issued to this tenant's users.
    pub session_duration_secs: u64,
    pub min_password_length: u32,
}

impl AuthSettings {
    pub fn is_enabled(&self, method: AuthMethod) -> bool {
        self.methods.contains(&method)
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.min_password_length,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthSettings {
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            branding: Branding {
                name: DEFAULT_BRAND_NAME.into(),
                logo_url: None,
                primary_color: DEFAULT_PRIMARY_COLOR.into(),
                description: None,
            },
            auth: AuthSettings {
                methods: vec![AuthMethod::Password],
                session_duration_secs: DEFAULT_SESSION_DURATION_SECS,
                min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            },
            oauth: OAuthSettings {
                redirect_uris: Vec::new(),
                scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

/// Password rules enforced at registration and password change.
///
/// A non-empty password is always required; `min_length` tightens that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// Partial configuration update.
///
/// Serializes to exactly the fields that are present, so it can be
/// deep-merged into the stored document in a single write.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TenantConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<BrandingPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSettingsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthSettingsPatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BrandingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AuthSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<AuthMethod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_password_length: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OAuthSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl BrandingPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.logo_url.is_none()
            && self.primary_color.is_none()
            && self.description.is_none()
    }
}

impl AuthSettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.methods.is_none()
            && self.session_duration_secs.is_none()
            && self.min_password_length.is_none()
    }
}

impl OAuthSettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.redirect_uris.is_none() && self.scopes.is_none()
    }
}

impl From<TenantConfig> for TenantConfigPatch {
    /// A patch that sets every field of `config`.
    fn from(config: TenantConfig) -> Self {
        Self {
            branding: Some(BrandingPatch {
                name: Some(config.branding.name),
                logo_url: config.branding.logo_url,
                primary_color: Some(config.branding.primary_color),
                description: config.branding.description,
            }),
            auth: Some(AuthSettingsPatch {
                methods: Some(config.auth.methods),
                session_duration_secs: Some(config.auth.session_duration_secs),
                min_password_length: Some(config.auth.min_password_length),
            }),
            oauth: Some(OAuthSettingsPatch {
                redirect_uris: Some(config.oauth.redirect_uris),
                scopes: Some(config.oauth.scopes),
            }),
        }
    }
}

impl TenantConfigPatch {
    /// `true` when no section carries a field to write.
    pub fn is_empty(&self) -> bool {
        self.branding.as_ref().is_none_or(BrandingPatch::is_empty)
            && self.auth.as_ref().is_none_or(AuthSettingsPatch::is_empty)
            && self.oauth.as_ref().is_none_or(OAuthSettingsPatch::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_is_fixed() {
        let cfg = TenantConfig::default();
        assert_eq!(cfg.branding.name, "My App");
        assert_eq!(cfg.auth.methods, vec![AuthMethod::Password]);
        assert_eq!(cfg.auth.session_duration_secs, 3600);
        assert_eq!(cfg.auth.min_password_length, 8);
        assert!(cfg.oauth.redirect_uris.is_empty());
        assert_eq!(cfg.oauth.scopes, vec!["openid", "profile", "email"]);
        assert_eq!(cfg, TenantConfig::default());
    }

    #[test]
    fn sections_without_fields_count_as_empty() {
        let patch = TenantConfigPatch {
            branding: Some(BrandingPatch::default()),
            auth: None,
            oauth: Some(OAuthSettingsPatch::default()),
        };
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_serializes_sparse_document() {
        let patch = TenantConfigPatch {
            branding: Some(BrandingPatch {
                primary_color: Some("#000000".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "branding": { "primary_color": "#000000" } })
        );
    }

    #[test]
    fn auth_methods_use_snake_case() {
        let json = serde_json::to_value(AuthMethod::MagicLink).unwrap();
        assert_eq!(json, serde_json::json!("magic_link"));
        let settings = TenantConfig::default().auth;
        assert!(settings.is_enabled(AuthMethod::Password));
        assert!(!settings.is_enabled(AuthMethod::OAuth));
    }
}
