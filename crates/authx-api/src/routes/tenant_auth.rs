//! Authentication endpoints inside one tenant.
//!
//! Signup, login and the password reset pair are public: they establish
//! identity. `me` and `change-password` require a bearer token issued for
//! the tenant in the path.

use authx_auth::{Identity, RegisterUser};
use authx_core::models::user::User;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::extract::{bearer, tenant_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    email: String,
    password: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

async fn caller(state: &AppState, id: &str, headers: &HeaderMap) -> Result<Identity, ApiError> {
    Ok(state
        .gateway
        .authenticate_request(tenant_id(id)?, bearer(headers))
        .await?)
}

pub async fn signup(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let session = state
        .tenant_auth
        .signup(
            tenant_id(&id)?,
            RegisterUser {
                email: body.email,
                password: body.password,
                username: body.username,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let session = state
        .tenant_auth
        .login(tenant_id(&id)?, &body.email, &body.password)
        .await?;
    Ok(Json(session))
}

/// Always answers 202 for a known tenant; the token travels out of band.
pub async fn forgot_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    state
        .tenant_auth
        .forgot_password(tenant_id(&id)?, &body.email)
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "if the email is registered, a reset link has been sent",
        })),
    ))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    state
        .tenant_auth
        .reset_password(tenant_id(&id)?, &body.token, &body.new_password)
        .await?;
    Ok(Json(json!({ "message": "password has been reset" })))
}

pub async fn me(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiError> {
    let identity = caller(&state, &id, &headers).await?;
    Ok(Json(state.tenant_auth.me(&identity).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let identity = caller(&state, &id, &headers).await?;
    state
        .tenant_auth
        .change_password(&identity, &body.current_password, &body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
