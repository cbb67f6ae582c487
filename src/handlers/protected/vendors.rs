// handlers/protected/vendors.rs - POST /api/vendors

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use super::utils::{optional_text, FieldErrors};
use crate::app::AppState;
use crate::database::models::{NewVendor, Vendor};
use crate::database::RowWriter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct CreateVendor {
    pub name: Option<String>,
    pub website: Option<String>,
}

/// The caller is recorded as the vendor's owner.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CreateVendor>, JsonRejection>,
) -> ApiResult<Vendor> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", body.name);
    errors.into_result()?;

    let vendor = NewVendor {
        name,
        website: optional_text(body.website),
        user_id: Some(auth_user.user_id),
    };
    Ok(ApiResponse::created(state.store.insert(&vendor).await?))
}
