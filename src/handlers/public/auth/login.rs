// handlers/public/auth/login.rs - POST /api/auth/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

use super::{issue_token, Credentials, TokenResponse};
use crate::app::AppState;
use crate::auth::verify_password_blocking;
use crate::database::models::User;
use crate::database::RowFetcher;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};

/// Unknown email and wrong password get the same 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(credentials) = payload?;
    let (email, password) = credentials.require()?;

    let user = state
        .store
        .fetch_one::<User>(&Filter::new().eq("email", email.as_str()))
        .await?;

    let Some(user) = user else {
        warn!("login attempt for unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };
    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login attempt with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(ApiResponse::success(issue_token(user.email, user.id)?))
}
