// handlers/protected/vulnerabilities.rs - POST /api/vulnerabilities,
// DELETE /api/vulnerabilities/:id, POST /api/vulnerabilities/:id/threats

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::utils::{delete_by_id, ensure_exists, optional_text, FieldErrors};
use crate::app::AppState;
use crate::database::models::{
    NewVulnerability, Severity, Software, Threat, Vulnerability, VulnerabilityThreat,
};
use crate::database::{DatabaseError, RowFetcher, RowWriter, Table};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateVulnerability {
    pub software_id: Option<i64>,
    pub cve_id: Option<String>,
    pub summary: Option<String>,
    pub severity: Option<String>,
    pub cvss_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LinkThreat {
    pub threat_id: Option<i64>,
}

/// `published` is set to the time of creation.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateVulnerability>, JsonRejection>,
) -> ApiResult<Vulnerability> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let software_id = errors.required_id("software_id", body.software_id);
    let cve_id = errors.required_text("cve_id", body.cve_id);

    let severity = match optional_text(body.severity).map(|s| s.parse::<Severity>()) {
        Some(Ok(severity)) => Some(severity),
        Some(Err(e)) => {
            errors.add("severity", e.to_string());
            None
        }
        None => None,
    };
    if let Some(score) = body.cvss_score {
        if !(0.0..=10.0).contains(&score) {
            errors.add("cvss_score", "CVSS score must be between 0 and 10");
        }
    }
    errors.into_result()?;

    ensure_exists::<Software>(&state.store, "software_id", software_id).await?;

    let vulnerability = NewVulnerability {
        software_id,
        cve_id,
        summary: optional_text(body.summary),
        severity,
        cvss_score: body.cvss_score,
        published: Utc::now(),
    };
    let created = state.store.insert(&vulnerability).await?;
    tracing::info!(id = created.id, cve_id = %created.cve_id, "created vulnerability");
    Ok(ApiResponse::created(created))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    delete_by_id(&state.store, Table::Vulnerabilities, id).await
}

/// 404 for an unknown vulnerability or threat, 409 when already linked.
pub async fn link_threat(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<LinkThreat>, JsonRejection>,
) -> ApiResult<VulnerabilityThreat> {
    let Json(body) = payload?;

    let mut errors = FieldErrors::new();
    let threat_id = errors.required_id("threat_id", body.threat_id);
    errors.into_result()?;

    let by_id = |id: i64| Filter::new().eq("id", id);
    if state.store.fetch_one::<Vulnerability>(&by_id(id)).await?.is_none() {
        return Err(ApiError::not_found(format!("No vulnerabilities record with id {}", id)));
    }
    if state.store.fetch_one::<Threat>(&by_id(threat_id)).await?.is_none() {
        return Err(ApiError::not_found(format!("No threats record with id {}", threat_id)));
    }

    let link = VulnerabilityThreat { vulnerability_id: id, threat_id };
    let created = state.store.insert(&link).await.map_err(|e| match e {
        DatabaseError::UniqueViolation(_) => ApiError::conflict("Threat is already linked to this vulnerability"),
        other => other.into(),
    })?;
    Ok(ApiResponse::created(created))
}
