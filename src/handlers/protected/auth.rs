// handlers/protected/auth.rs - GET /api/auth/whoami

use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn whoami(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "email": auth_user.email,
        "user_id": auth_user.user_id,
    })))
}
