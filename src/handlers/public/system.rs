// handlers/public/system.rs - Service info, health and API description

use axum::{extract::State, Json};
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "VulnTracker API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Vulnerability, threat and patch tracking API",
            "endpoints": {
                "health": "/health (public)",
                "docs": "/api/docs (public)",
                "auth": "/api/auth/register, /api/auth/login (public), /api/auth/whoami (protected)",
                "catalog": "/api/{vendors,software,vulnerabilities,threats,threat-types,patches} (GET public, writes protected)",
                "chat": "/api/chat (protected)",
            }
        }
    }))
}

/// GET /health - 503 with the error envelope when the store does not answer
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.store.health_check().await {
        tracing::error!(store = state.store.kind(), "Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok",
            "store": state.store.kind(),
        }
    })))
}

/// GET /api/docs - OpenAPI 3 description of the public surface
pub async fn docs() -> Json<Value> {
    Json(openapi_document())
}

fn list_path(tag: &str, summary: &str, create_required: &[&str]) -> Value {
    json!({
        "get": {
            "tags": [tag],
            "summary": summary,
            "responses": {"200": {"description": "Envelope with an array of records"}}
        },
        "post": {
            "tags": [tag],
            "security": [{"bearerAuth": []}],
            "requestBody": {
                "required": true,
                "content": {"application/json": {"schema": {"type": "object", "required": create_required}}}
            },
            "responses": {
                "201": {"description": "Created record"},
                "400": {"description": "Validation error"},
                "401": {"description": "Missing or invalid token"}
            }
        }
    })
}

fn delete_path(tag: &str) -> Value {
    json!({
        "delete": {
            "tags": [tag],
            "security": [{"bearerAuth": []}],
            "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}],
            "responses": {
                "200": {"description": "Deleted"},
                "404": {"description": "No record with that id"},
                "409": {"description": "Record is still referenced"}
            }
        }
    })
}

fn auth_path(summary: &str, ok: &str, failure: (&str, &str), protected: bool) -> Value {
    let (failure_code, failure_description) = failure;
    let mut operation = json!({
        "tags": ["auth"],
        "summary": summary,
        "responses": {
            ok: {"description": "Token"},
            failure_code: {"description": failure_description}
        }
    });
    if protected {
        operation["security"] = json!([{"bearerAuth": []}]);
    }
    operation
}

fn openapi_document() -> Value {
    let mut paths = Map::new();

    paths.insert(
        "/api/auth/register".into(),
        json!({"post": auth_path("Create an account", "201", ("409", "User already exists"), false)}),
    );
    paths.insert(
        "/api/auth/login".into(),
        json!({"post": auth_path("Exchange credentials for a token", "200", ("401", "Invalid credentials"), false)}),
    );
    paths.insert(
        "/api/auth/whoami".into(),
        json!({"get": auth_path("Authenticated identity", "200", ("401", "Missing or invalid token"), true)}),
    );

    paths.insert("/api/vendors".into(), list_path("vendors", "Vendors, newest first", &["name"]));
    paths.insert(
        "/api/software".into(),
        list_path("software", "Software with vendor and vulnerability count", &["name", "vendor_id"]),
    );
    paths.insert("/api/software/{id}".into(), delete_path("software"));
    paths.insert(
        "/api/vulnerabilities".into(),
        list_path(
            "vulnerabilities",
            "Vulnerabilities with software, vendor and patch count",
            &["software_id", "cve_id"],
        ),
    );
    paths.insert("/api/vulnerabilities/{id}".into(), delete_path("vulnerabilities"));
    paths.insert(
        "/api/vulnerabilities/{id}/threats".into(),
        json!({
            "post": {
                "tags": ["vulnerabilities"],
                "summary": "Link a threat",
                "security": [{"bearerAuth": []}],
                "responses": {
                    "201": {"description": "Link created"},
                    "404": {"description": "Unknown vulnerability or threat"},
                    "409": {"description": "Already linked"}
                }
            }
        }),
    );
    paths.insert(
        "/api/threats".into(),
        list_path("threats", "Threats with type and linked vulnerabilities", &["name"]),
    );
    paths.insert("/api/threats/{id}".into(), delete_path("threats"));
    paths.insert("/api/threat-types".into(), list_path("threat-types", "Threat types", &["name"]));
    paths.insert(
        "/api/patches".into(),
        list_path(
            "patches",
            "Patches with vulnerability, software, vendor and threats",
            &["vulnerability_id", "url"],
        ),
    );
    paths.insert("/api/patches/{id}".into(), delete_path("patches"));
    paths.insert(
        "/api/chat".into(),
        json!({
            "post": {
                "tags": ["chat"],
                "summary": "Ask the security assistant",
                "security": [{"bearerAuth": []}],
                "responses": {
                    "200": {"description": "Model response"},
                    "502": {"description": "Model request failed"},
                    "503": {"description": "Assistant not configured"}
                }
            }
        }),
    );

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "VulnTracker API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": {"type": "http", "scheme": "bearer", "bearerFormat": "JWT"}
            }
        },
        "paths": paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, PgStore, Store};
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    #[tokio::test]
    async fn healthy_store_reports_ok() {
        let state = AppState::new(Store::Memory(MemoryStore::new()), None);
        let Json(body) = health(State(state)).await.unwrap();
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["store"], "memory");
    }

    #[tokio::test]
    async fn unreachable_database_uses_the_error_envelope() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://vulntracker@127.0.0.1:1/vulntracker")
            .unwrap();
        let state = AppState::new(Store::Postgres(PgStore::new(pool, false)), None);

        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(body["message"], "Database unavailable");
    }

    #[test]
    fn document_lists_every_resource() {
        let doc = openapi_document();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/api/vendors", "/api/software", "/api/vulnerabilities", "/api/threats", "/api/threat-types", "/api/patches"] {
            assert!(paths[path]["get"].is_object(), "{} has no GET", path);
            assert!(paths[path]["post"]["security"].is_array(), "{} POST is not protected", path);
        }
        assert_eq!(doc["openapi"], "3.0.3");
    }
}
