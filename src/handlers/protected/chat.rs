// handlers/protected/chat.rs - POST /api/chat

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::utils::optional_text;
use crate::app::AppState;
use crate::chat::ChatError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn send(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(body) = payload?;
    let message = optional_text(body.message).ok_or_else(|| ApiError::bad_request("Message is required"))?;

    let model = state.chat.as_ref().ok_or(ChatError::NotConfigured)?;
    info!(user = %auth_user.email, "chat request received");

    let response = model.generate(&message).await.map_err(|e| {
        error!(user = %auth_user.email, "chat request failed: {}", e);
        e
    })?;
    Ok(ApiResponse::success(ChatResponse { response }))
}
