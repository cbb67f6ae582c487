// handlers/protected/patches.rs - POST /api/patches, DELETE /api/patches/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{delete_by_id, ensure_exists, FieldErrors};
use crate::app::AppState;
use crate::database::models::{NewPatch, Vulnerability};
use crate::database::{RowWriter, Table};
use crate::graph::{load_patch_rows, GraphAssembler, PatchListItem};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreatePatch {
    pub vulnerability_id: Option<i64>,
    pub url: Option<String>,
    pub released: Option<DateTime<Utc>>,
}

/// Responds with the patch nested the same way as in the patch list.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePatch>, JsonRejection>,
) -> ApiResult<PatchListItem> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let vulnerability_id = errors.required_id("vulnerability_id", body.vulnerability_id);
    let url = errors.required_text("url", body.url);
    errors.into_result()?;

    ensure_exists::<Vulnerability>(&state.store, "vulnerability_id", vulnerability_id).await?;

    let patch = NewPatch {
        vulnerability_id,
        url,
        released: body.released,
    };
    let patch = state.store.insert(&patch).await?;

    let rows = load_patch_rows(state.store.as_ref(), &patch).await?;
    Ok(ApiResponse::created(GraphAssembler::new(&rows).patch_item(&patch)))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    delete_by_id(&state.store, Table::Patches, id).await
}
