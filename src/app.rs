//! Router assembly and shared request state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::chat::ChatModel;
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, rate_limit_middleware, RateLimiter};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    /// `None` when no model API key is configured.
    pub chat: Option<Arc<dyn ChatModel>>,
}

impl AppState {
    pub fn new(store: Store, chat: Option<Arc<dyn ChatModel>>) -> Self {
        Self {
            store: Arc::new(store),
            chat,
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut api = Router::new()
        .merge(public_api_routes())
        .merge(protected_routes().route_layer(middleware::from_fn(jwt_auth_middleware)));

    if config.api.enable_rate_limiting {
        let limiter = Arc::new(RateLimiter::new(
            config.api.rate_limit_requests,
            Duration::from_secs(config.api.rate_limit_window_secs),
            config.api.trust_forwarded_for,
        ));
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    let mut router = Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
                .layer(cors_layer(&config.security.cors_origins)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn public_api_routes() -> Router<AppState> {
    use public::{auth, catalog, system};

    Router::new()
        .route("/api/docs", get(system::docs))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/vendors", get(catalog::vendors))
        .route("/api/software", get(catalog::software))
        .route("/api/vulnerabilities", get(catalog::vulnerabilities))
        .route("/api/threats", get(catalog::threats))
        .route("/api/threat-types", get(catalog::threat_types))
        .route("/api/patches", get(catalog::patches))
}

fn protected_routes() -> Router<AppState> {
    use protected::{auth, chat, patches, software, threat_types, threats, vendors, vulnerabilities};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/vendors", post(vendors::create))
        .route("/api/software", post(software::create))
        .route("/api/software/:id", delete(software::remove))
        .route("/api/vulnerabilities", post(vulnerabilities::create))
        .route("/api/vulnerabilities/:id", delete(vulnerabilities::remove))
        .route("/api/vulnerabilities/:id/threats", post(vulnerabilities::link_threat))
        .route("/api/threats", post(threats::create))
        .route("/api/threats/:id", delete(threats::remove))
        .route("/api/threat-types", post(threat_types::create))
        .route("/api/patches", post(patches::create))
        .route("/api/patches/:id", delete(patches::remove))
        .route("/api/chat", post(chat::send))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::chat::ChatError;
    use crate::database::MemoryStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn generate(&self, message: &str) -> Result<String, ChatError> {
            Ok(format!("echo: {}", message))
        }
    }

    fn router(config: &AppConfig) -> Router {
        let store = MemoryStore::from_json(json!({
            "vendors": [{"id": 1, "name": "Acme", "website": "acme.com"}],
            "software": [{"id": 10, "name": "Widget", "vendor_id": 1}],
            "vulnerabilities": [
                {"id": 1, "software_id": 10, "cve_id": "CVE-2024-0001"},
                {"id": 2, "software_id": 10, "cve_id": "CVE-2024-0002"}
            ],
            "patches": [{"id": 100, "vulnerability_id": 999, "url": "https://fix/100"}]
        }))
        .unwrap();
        let chat: Arc<dyn ChatModel> = Arc::new(EchoModel);
        app(AppState::new(Store::Memory(store), Some(chat)), config)
    }

    fn token() -> String {
        generate_jwt(&Claims::new("tester@example.com".to_string(), uuid::Uuid::new_v4())).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn software_view_is_public_and_enveloped() {
        let request = Request::get("/api/software").body(Body::empty()).unwrap();
        let (status, body) = send(router(&AppConfig::development()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["vendor"]["name"], "Acme");
        assert_eq!(body["data"][0]["vulnerability_count"], 2);
    }

    #[tokio::test]
    async fn dangling_patch_is_served_with_null_vulnerability() {
        let request = Request::get("/api/patches").body(Body::empty()).unwrap();
        let (status, body) = send(router(&AppConfig::development()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], 100);
        assert!(body["data"][0]["vulnerability"].is_null());
    }

    #[tokio::test]
    async fn writes_require_a_token() {
        let config = AppConfig::development();
        let (status, body) = send(router(&config), post_json("/api/vendors", json!({"name": "Initech"}), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let token = token();
        let (status, body) =
            send(router(&config), post_json("/api/vendors", json!({"name": "Initech"}), Some(&token))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 2);
    }

    #[tokio::test]
    async fn chat_uses_the_configured_model() {
        let token = token();
        let (status, body) = send(
            router(&AppConfig::development()),
            post_json("/api/chat", json!({"message": "hello"}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["response"], "echo: hello");
    }

    #[tokio::test]
    async fn rate_limit_returns_429() {
        let mut config = AppConfig::development();
        config.api.enable_rate_limiting = true;
        config.api.rate_limit_requests = 2;
        config.api.trust_forwarded_for = true;
        let router = router(&config);

        for _ in 0..2 {
            let request = Request::get("/api/vendors").header("x-forwarded-for", "198.51.100.4").body(Body::empty()).unwrap();
            let (status, _) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::OK);
        }
        let request = Request::get("/api/vendors").header("x-forwarded-for", "198.51.100.4").body(Body::empty()).unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "TOO_MANY_REQUESTS");

        let request = Request::get("/health").header("x-forwarded-for", "198.51.100.4").body(Body::empty()).unwrap();
        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rotating_forwarded_for_is_ignored_without_a_proxy() {
        let mut config = AppConfig::development();
        config.api.enable_rate_limiting = true;
        config.api.rate_limit_requests = 2;
        let router = router(&config);

        let mut statuses = Vec::new();
        for i in 0..3 {
            let request = Request::get("/api/vendors")
                .header("x-forwarded-for", format!("198.51.100.{}", i))
                .body(Body::empty())
                .unwrap();
            statuses.push(send(router.clone(), request).await.0);
        }
        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]);
    }
}
