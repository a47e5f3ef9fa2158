//! Platform account endpoints.

use authx_auth::RegisterAccount;
use authx_core::models::account::Account;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::AccountCaller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    email: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let session = state
        .accounts
        .signup(RegisterAccount {
            email: body.email,
            password: body.password,
            name: body.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let session = state.accounts.login(&body.email, &body.password).await?;
    Ok(Json(session))
}

pub async fn me(
    State(state): State<AppState>,
    AccountCaller(caller): AccountCaller,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.accounts.find_by_id(caller.account_id).await?))
}
