//! Route table.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use authx_core::error::AuthxError;
use authx_core::repository::{PaginatedResult, Pagination};

use crate::error::ApiError;
use crate::state::AppState;

mod accounts;
mod apps;
mod tenant_auth;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/accounts/signup", post(accounts::signup))
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/me", get(accounts::me))
        .route("/apps", post(apps::create).get(apps::list))
        .route(
            "/apps/{id}",
            get(apps::get_one).patch(apps::update).delete(apps::delete),
        )
        .route("/apps/{id}/secret/rotate", post(apps::rotate_secret))
        .route("/apps/{id}/users", get(apps::list_users))
        .route(
            "/apps/{id}/config",
            get(apps::get_config).patch(apps::update_config),
        )
        .route("/apps/{id}/config/reset", post(apps::reset_config))
        .route("/apps/{id}/oauth/scopes", get(apps::oauth_scopes))
        .route("/apps/{id}/oauth/redirect-check", get(apps::redirect_check))
        .route("/apps/{id}/auth/signup", post(tenant_auth::signup))
        .route("/apps/{id}/auth/login", post(tenant_auth::login))
        .route(
            "/apps/{id}/auth/forgot-password",
            post(tenant_auth::forgot_password),
        )
        .route(
            "/apps/{id}/auth/reset-password",
            post(tenant_auth::reset_password),
        )
        .route("/apps/{id}/auth/me", get(tenant_auth::me))
        .route(
            "/apps/{id}/auth/change-password",
            post(tenant_auth::change_password),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Largest offset the store accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// `?offset=&limit=` query parameters. The limit is capped at 100.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    offset: Option<u64>,
    limit: Option<u64>,
}

impl PageParams {
    pub(crate) fn into_pagination(self) -> Result<Pagination, ApiError> {
        let defaults = Pagination::default();
        let offset = self.offset.unwrap_or(defaults.offset);
        if offset > MAX_OFFSET {
            let message = format!("offset must be at most {MAX_OFFSET}");
            return Err(AuthxError::validation(message).into());
        }
        Ok(Pagination {
            offset,
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, 100),
        })
    }
}

pub(crate) fn page_json<T: serde::Serialize>(page: PaginatedResult<T>) -> Json<Value> {
    Json(json!({
        "items": page.items,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
    }))
}
