// handlers/protected/threats.rs - POST /api/threats, DELETE /api/threats/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::utils::{delete_by_id, ensure_exists, optional_text, FieldErrors};
use crate::app::AppState;
use crate::database::models::{NewThreat, Threat, ThreatType};
use crate::database::{RowWriter, Table};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateThreat {
    pub name: Option<String>,
    pub description: Option<String>,
    pub threat_type_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateThreat>, JsonRejection>,
) -> ApiResult<Threat> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", body.name);
    errors.into_result()?;

    if let Some(threat_type_id) = body.threat_type_id {
        ensure_exists::<ThreatType>(&state.store, "threat_type_id", threat_type_id).await?;
    }

    let threat = NewThreat {
        name,
        description: optional_text(body.description),
        threat_type_id: body.threat_type_id,
    };
    Ok(ApiResponse::created(state.store.insert(&threat).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    delete_by_id(&state.store, Table::Threats, id).await
}
