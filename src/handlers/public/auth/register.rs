// handlers/public/auth/register.rs - POST /api/auth/register

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use super::{issue_token, Credentials, TokenResponse};
use crate::app::AppState;
use crate::auth::hash_password_blocking;
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, RowFetcher, RowWriter};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};

/// Create an account and return a token for it. 409 when the email is taken.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(credentials) = payload?;
    let (email, password) = credentials.require()?;

    if !email.contains('@') {
        return Err(ApiError::validation_error("Invalid email address", None));
    }

    let existing = state
        .store
        .fetch_one::<User>(&Filter::new().eq("email", email.as_str()))
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let user = NewUser {
        id: Uuid::new_v4(),
        email,
        password_hash: hash_password_blocking(password).await?,
    };
    let user = state.store.insert(&user).await.map_err(|e| match e {
        DatabaseError::UniqueViolation(_) => ApiError::conflict("User already exists"),
        other => other.into(),
    })?;

    info!(user_id = %user.id, "registered user");
    Ok(ApiResponse::created(issue_token(user.email, user.id)?))
}
