//! Tenant ("App") domain model.
//!
//! A tenant is an independent client application with its own isolated
//! user base, secret credential and configuration. Every user and reset
//! token is scoped to exactly one tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant_config::TenantConfig;

/// Full tenant record, as seen by its owner.
///
/// This is the only view that carries `secret`. Listing endpoints use
/// [`TenantSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// The platform account that created (and may modify) this tenant.
    pub owner_id: Uuid,
    pub name: String,
    /// Free-form category, e.g. `web`, `mobile`, `service`.
    pub app_type: String,
    pub domain: Option<String>,
    /// Rotatable secret credential.
    pub secret: String,
    pub config: TenantConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Secret-free projection of a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub app_type: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tenant> for TenantSummary {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.id,
            owner_id: t.owner_id,
            name: t.name,
            app_type: t.app_type,
            domain: t.domain,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Fields required to create a new tenant.
///
/// The secret is minted by the registry, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub owner_id: Uuid,
    pub name: String,
    pub app_type: String,
    pub domain: Option<String>,
    pub secret: String,
    pub config: TenantConfig,
}

/// The allow-list of tenant fields an owner may change.
///
/// Absent fields are left untouched. Anything not named here (owner,
/// secret, config, timestamps) cannot be reached through an update.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateTenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl UpdateTenant {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.app_type.is_none() && self.domain.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_detected() {
        assert!(UpdateTenant::default().is_empty());
        let patch = UpdateTenant {
            domain: Some("example.com".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn unknown_fields_are_dropped_from_patch() {
        // owner_id / secret are not part of the allow-list.
        let patch: UpdateTenant = serde_json::from_value(serde_json::json!({
            "owner_id": "00000000-0000-0000-0000-000000000000",
            "secret": "attacker-chosen",
        }))
        .unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = UpdateTenant {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "name": "Renamed" })
        );
    }

    #[test]
    fn summary_has_no_secret() {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Shop".into(),
            app_type: "web".into(),
            domain: None,
            secret: "s3cr3t".into(),
            config: TenantConfig::default(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&TenantSummary::from(tenant)).unwrap();
        assert!(!json.contains("s3cr3t"));
        assert!(!json.contains("secret"));
    }
}
