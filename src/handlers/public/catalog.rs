// handlers/public/catalog.rs - GET list handlers for every resource
//
// The four nested views share one path: load the tables the view's policy
// names, then assemble.

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{ThreatType, Vendor};
use crate::database::{RowFetcher, Store};
use crate::filter::Filter;
use crate::graph::{load_rows, AssembledView, GraphAssembler, ViewKind};
use crate::middleware::{ApiResponse, ApiResult};

async fn view(store: &Store, view: ViewKind) -> ApiResult<AssembledView> {
    let rows = load_rows(store, view).await?;
    Ok(ApiResponse::success(GraphAssembler::new(&rows).assemble(view)))
}

/// GET /api/vendors
pub async fn vendors(State(state): State<AppState>) -> ApiResult<Vec<Vendor>> {
    let filter = Filter::new().order("created_at desc")?;
    Ok(ApiResponse::success(state.store.fetch(&filter).await?))
}

/// GET /api/threat-types
pub async fn threat_types(State(state): State<AppState>) -> ApiResult<Vec<ThreatType>> {
    let filter = Filter::new().order("name")?;
    Ok(ApiResponse::success(state.store.fetch(&filter).await?))
}

/// GET /api/software
pub async fn software(State(state): State<AppState>) -> ApiResult<AssembledView> {
    view(&state.store, ViewKind::SoftwareList).await
}

/// GET /api/vulnerabilities
pub async fn vulnerabilities(State(state): State<AppState>) -> ApiResult<AssembledView> {
    view(&state.store, ViewKind::VulnerabilityList).await
}

/// GET /api/threats
pub async fn threats(State(state): State<AppState>) -> ApiResult<AssembledView> {
    view(&state.store, ViewKind::ThreatList).await
}

/// GET /api/patches
pub async fn patches(State(state): State<AppState>) -> ApiResult<AssembledView> {
    view(&state.store, ViewKind::PatchList).await
}
