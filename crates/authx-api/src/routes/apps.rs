//! Tenant ("App") management endpoints.
//!
//! Everything here except configuration reads and OAuth discovery is an
//! owner operation: an account token plus an ownership check against the
//! tenant record.

use authx_auth::gateway::authorize_ownership;
use authx_auth::{AccountIdentity, NewTenant};
use authx_core::models::tenant::{Tenant, UpdateTenant};
use authx_core::models::tenant_config::{TenantConfig, TenantConfigPatch};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{PageParams, page_json};
use crate::error::ApiError;
use crate::extract::{AccountCaller, bearer, tenant_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAppRequest {
    name: String,
    app_type: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    config: Option<TenantConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectCheckParams {
    uri: String,
}

/// Load a tenant and require `caller` to own it.
async fn owned_tenant(
    state: &AppState,
    id: Uuid,
    caller: &AccountIdentity,
) -> Result<Tenant, ApiError> {
    let tenant = state.registry.get(id).await?;
    authorize_ownership(tenant.owner_id, caller.account_id)?;
    Ok(tenant)
}

pub async fn create(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    body: Result<Json<CreateAppRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let tenant = state
        .registry
        .create(
            caller.account_id,
            NewTenant {
                name: body.name,
                app_type: body.app_type,
                domain: body.domain,
                config: body.config,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn list(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let page = state
        .registry
        .list_by_owner(caller.account_id, params.into_pagination()?)
        .await?;
    Ok(page_json(page))
}

pub async fn get_one(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    Ok(Json(tenant))
}

pub async fn update(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
    body: Result<Json<UpdateTenant>, JsonRejection>,
) -> Result<Json<Tenant>, ApiError> {
    let Json(patch) = body?;
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    Ok(Json(state.registry.update(tenant.id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    state.registry.delete(tenant.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rotate_secret(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    let secret = state.registry.rotate_secret(tenant.id).await?;
    Ok(Json(json!({ "id": tenant.id, "secret": secret })))
}

pub async fn list_users(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    let page = state
        .tenant_auth
        .directory()
        .list_all(tenant.id, params.into_pagination()?)
        .await?;
    Ok(page_json(page))
}

/// Configuration read for a signed-in user of this tenant.
pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TenantConfig>, ApiError> {
    let id = tenant_id(&id)?;
    state.gateway.authenticate_request(id, bearer(&headers)).await?;
    Ok(Json(state.configs.get(id).await?))
}

pub async fn update_config(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
    body: Result<Json<TenantConfigPatch>, JsonRejection>,
) -> Result<Json<TenantConfig>, ApiError> {
    let Json(patch) = body?;
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    Ok(Json(state.configs.update(tenant.id, patch).await?))
}

pub async fn reset_config(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
    Path(id): Path<String>,
) -> Result<Json<TenantConfig>, ApiError> {
    let tenant = owned_tenant(&state, tenant_id(&id)?, &caller).await?;
    Ok(Json(state.configs.reset_to_default(tenant.id).await?))
}

/// Public OAuth discovery.
pub async fn oauth_scopes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let scopes = state.configs.allowed_scopes(tenant_id(&id)?).await?;
    Ok(Json(json!({ "scopes": scopes })))
}

pub async fn redirect_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<RedirectCheckParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let allowed = state
        .configs
        .is_redirect_allowed(tenant_id(&id)?, &params.uri)
        .await?;
    Ok(Json(json!({ "uri": params.uri, "allowed": allowed })))
}
