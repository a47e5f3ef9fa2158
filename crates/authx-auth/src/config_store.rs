//! Tenant configuration store.
//!
//! Reads, partially updates and resets the configuration document of a
//! tenant. Updates are validated here and deep-merged by the repository in
//! one write.

use authx_core::error::{AuthxError, AuthxResult};
use authx_core::models::tenant_config::{
    AuthSettingsPatch, BrandingPatch, MAX_MIN_PASSWORD_LENGTH, MAX_SESSION_DURATION_SECS,
    OAuthSettingsPatch, TenantConfig, TenantConfigPatch,
};
use authx_core::repository::TenantConfigRepository;
use tracing::info;
use url::Url;
use uuid::Uuid;

pub struct TenantConfigStore<R: TenantConfigRepository> {
    repo: R,
}

impl<R: TenantConfigRepository> TenantConfigStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get(&self, tenant_id: Uuid) -> AuthxResult<TenantConfig> {
        self.repo.get(tenant_id).await
    }

    /// Merge the present fields of `patch` into the stored document.
    /// Sections and fields the patch leaves out are untouched.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        patch: TenantConfigPatch,
    ) -> AuthxResult<TenantConfig> {
        if patch.is_empty() {
            return Err(AuthxError::NoFieldsToUpdate);
        }
        validate_patch(&patch)?;

        let config = self.repo.merge(tenant_id, patch).await?;
        info!(tenant_id = %tenant_id, "tenant config updated");
        Ok(config)
    }

    /// Overwrite the whole document with [`TenantConfig::default`].
    pub async fn reset_to_default(&self, tenant_id: Uuid) -> AuthxResult<TenantConfig> {
        let config = self.repo.replace(tenant_id, TenantConfig::default()).await?;
        info!(tenant_id = %tenant_id, "tenant config reset to default");
        Ok(config)
    }

    /// OAuth scopes the tenant allows. Public discovery data.
    pub async fn allowed_scopes(&self, tenant_id: Uuid) -> AuthxResult<Vec<String>> {
        Ok(self.repo.get(tenant_id).await?.oauth.scopes)
    }

    /// Exact-match check of `uri` against the redirect allow-list.
    pub async fn is_redirect_allowed(&self, tenant_id: Uuid, uri: &str) -> AuthxResult<bool> {
        let config = self.repo.get(tenant_id).await?;
        Ok(config.oauth.redirect_uris.iter().any(|allowed| allowed == uri))
    }
}

/// Validate a complete configuration document.
pub fn validate_config(config: &TenantConfig) -> AuthxResult<()> {
    validate_patch(&TenantConfigPatch::from(config.clone()))
}

pub(crate) fn validate_patch(patch: &TenantConfigPatch) -> AuthxResult<()> {
    if let Some(branding) = &patch.branding {
        validate_branding(branding)?;
    }
    if let Some(auth) = &patch.auth {
        validate_auth(auth)?;
    }
    if let Some(oauth) = &patch.oauth {
        validate_oauth(oauth)?;
    }
    Ok(())
}

fn validate_branding(patch: &BrandingPatch) -> AuthxResult<()> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AuthxError::validation("branding.name must not be empty"));
    }
    if let Some(logo) = &patch.logo_url {
        absolute_url("branding.logo_url", logo)?;
    }
    if patch.primary_color.as_deref().is_some_and(|c| !is_hex_color(c)) {
        return Err(AuthxError::validation(
            "branding.primary_color must be a #RGB or #RRGGBB color",
        ));
    }
    Ok(())
}

fn validate_auth(patch: &AuthSettingsPatch) -> AuthxResult<()> {
    if patch.methods.as_ref().is_some_and(Vec::is_empty) {
        return Err(AuthxError::validation(
            "auth.methods must enable at least one method",
        ));
    }
    if patch
        .session_duration_secs
        .is_some_and(|secs| secs == 0 || secs > MAX_SESSION_DURATION_SECS)
    {
        return Err(AuthxError::validation(format!(
            "auth.session_duration_secs must be between 1 and {MAX_SESSION_DURATION_SECS}"
        )));
    }
    if patch
        .min_password_length
        .is_some_and(|len| len == 0 || len > MAX_MIN_PASSWORD_LENGTH)
    {
        return Err(AuthxError::validation(format!(
            "auth.min_password_length must be between 1 and {MAX_MIN_PASSWORD_LENGTH}"
        )));
    }
    Ok(())
}

fn validate_oauth(patch: &OAuthSettingsPatch) -> AuthxResult<()> {
    for uri in patch.redirect_uris.iter().flatten() {
        absolute_url("oauth.redirect_uris", uri)?;
    }
    for scope in patch.scopes.iter().flatten() {
        if scope.is_empty() || scope.chars().any(char::is_whitespace) {
            return Err(AuthxError::validation(format!(
                "oauth.scopes contains an invalid scope: {scope:?}"
            )));
        }
    }
    Ok(())
}

fn absolute_url(field: &str, raw: &str) -> AuthxResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| AuthxError::validation(format!("{field}: invalid URL {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(AuthxError::validation(format!(
            "{field}: {raw:?} is not an absolute URL"
        )));
    }
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
