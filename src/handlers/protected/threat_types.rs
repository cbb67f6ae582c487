// handlers/protected/threat_types.rs - POST /api/threat-types

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use super::utils::{optional_text, FieldErrors};
use crate::app::AppState;
use crate::database::models::{NewThreatType, ThreatType};
use crate::database::RowWriter;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateThreatType {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateThreatType>, JsonRejection>,
) -> ApiResult<ThreatType> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", body.name);
    errors.into_result()?;

    let threat_type = NewThreatType {
        name,
        description: optional_text(body.description),
    };
    Ok(ApiResponse::created(state.store.insert(&threat_type).await?))
}
