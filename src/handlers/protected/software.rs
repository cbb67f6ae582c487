// handlers/protected/software.rs - POST /api/software, DELETE /api/software/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{delete_by_id, ensure_exists, optional_text, FieldErrors};
use crate::app::AppState;
use crate::database::models::{NewSoftware, Software, Vendor};
use crate::database::{RowWriter, Table};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateSoftware {
    pub name: Option<String>,
    pub version: Option<String>,
    pub vendor_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateSoftware>, JsonRejection>,
) -> ApiResult<Software> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", body.name);
    let vendor_id = errors.required_id("vendor_id", body.vendor_id);
    errors.into_result()?;

    ensure_exists::<Vendor>(&state.store, "vendor_id", vendor_id).await?;

    let software = NewSoftware {
        name,
        version: optional_text(body.version),
        vendor_id,
    };
    Ok(ApiResponse::created(state.store.insert(&software).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    delete_by_id(&state.store, Table::Software, id).await
}
