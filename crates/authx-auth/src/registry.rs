//! Tenant registry: lifecycle of tenant ("App") records.
//!
//! The registry persists; it does not authorize. Ownership is checked by
//! the gateway before any mutating call reaches this type.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::tenant::{CreateTenant, Tenant, TenantSummary, UpdateTenant};
use authx_core::models::tenant_config::TenantConfig;
use authx_core::repository::{PaginatedResult, Pagination, TenantRepository};
use subtle::ConstantTimeEq;
use tracing::info;
use uuid::Uuid;

use crate::config_store::validate_config;
use crate::token;

/// Caller-supplied fields for a new tenant.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub app_type: String,
    pub domain: Option<String>,
    /// Starting configuration; the default document when absent.
    pub config: Option<TenantConfig>,
}

pub struct TenantRegistry<T: TenantRepository> {
    repo: T,
}

impl<T: TenantRepository> TenantRegistry<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    /// Create a tenant owned by `owner_id` with a freshly minted secret.
    ///
    /// The returned record is the owner view and carries the secret.
    pub async fn create(&self, owner_id: Uuid, input: NewTenant) -> AuthxResult<Tenant> {
        let name = required("name", &input.name)?;
        let app_type = required("app_type", &input.app_type)?;
        let domain = optional(input.domain);
        let config = input.config.unwrap_or_default();
        validate_config(&config)?;

        let tenant = self
            .repo
            .create(CreateTenant {
                owner_id,
                name,
                app_type,
                domain,
                secret: token::generate_secret(),
                config,
            })
            .await?;

        info!(tenant_id = %tenant.id, owner_id = %owner_id, "tenant created");
        Ok(tenant)
    }

    pub async fn get(&self, tenant_id: Uuid) -> AuthxResult<Tenant> {
        self.repo.get_by_id(tenant_id).await
    }

    /// Secret-free listing of an owner's tenants.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        pagination: Pagination,
    ) -> AuthxResult<PaginatedResult<TenantSummary>> {
        self.repo.list_by_owner(owner_id, pagination).await
    }

    /// Apply the allow-listed fields present in `patch`.
    ///
    /// A blank domain counts as absent, as it does at creation. A patch
    /// left empty fails with `NoFieldsToUpdate` before any write.
    pub async fn update(&self, tenant_id: Uuid, patch: UpdateTenant) -> AuthxResult<Tenant> {
        let patch = UpdateTenant {
            name: patch.name.map(|n| required("name", &n)).transpose()?,
            app_type: patch
                .app_type
                .map(|t| required("app_type", &t))
                .transpose()?,
            domain: optional(patch.domain),
        };
        if patch.is_empty() {
            return Err(AuthxError::NoFieldsToUpdate);
        }

        let tenant = self.repo.update(tenant_id, patch).await?;
        info!(tenant_id = %tenant_id, "tenant updated");
        Ok(tenant)
    }

    /// Replace the tenant secret. The previous secret stops verifying as
    /// soon as this returns.
    pub async fn rotate_secret(&self, tenant_id: Uuid) -> AuthxResult<String> {
        let secret = token::generate_secret();
        self.repo.set_secret(tenant_id, secret.clone()).await?;
        info!(tenant_id = %tenant_id, "tenant secret rotated");
        Ok(secret)
    }

    /// Check a presented secret against the tenant's current one.
    pub async fn verify_secret(&self, tenant_id: Uuid, presented: &str) -> AuthxResult<()> {
        let tenant = self.repo.get_by_id(tenant_id).await?;
        let matches: bool = tenant
            .secret
            .as_bytes()
            .ct_eq(presented.as_bytes())
            .into();
        if matches {
            Ok(())
        } else {
            Err(AuthxError::AuthenticationFailed {
                reason: "invalid tenant secret".into(),
            })
        }
    }

    /// Delete the tenant and everything scoped to it.
    pub async fn delete(&self, tenant_id: Uuid) -> AuthxResult<()> {
        self.repo.delete(tenant_id).await?;
        info!(tenant_id = %tenant_id, "tenant deleted");
        Ok(())
    }
}

fn required(field: &str, value: &str) -> AuthxResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthxError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
