use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    by_client: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    trust_forwarded_for: bool,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, trust_forwarded_for: bool) -> Self {
        Self {
            limit,
            window,
            trust_forwarded_for,
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Count one request for `key`; false once the window's limit is spent.
    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;

        // Expired windows are dropped at most once per window length.
        if now.saturating_duration_since(windows.last_sweep) >= self.window {
            let length = self.window;
            windows
                .by_client
                .retain(|_, w| now.saturating_duration_since(w.started) < length);
            windows.last_sweep = now;
        }

        let window = windows
            .by_client
            .entry(key.to_string())
            .or_insert(Window { started: now, count: 0 });

        if now.saturating_duration_since(window.started) >= self.window {
            *window = Window { started: now, count: 0 };
        }
        if window.count >= self.limit {
            return false;
        }
        window.count += 1;
        true
    }

    /// Peer address, or the first `X-Forwarded-For` hop when a proxy is trusted.
    fn client_key(&self, headers: &HeaderMap, request: &Request) -> String {
        if self.trust_forwarded_for {
            if let Some(ip) = forwarded_for(headers) {
                return ip.to_string();
            }
        }
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = limiter.client_key(&headers, &request);
    if !limiter.allow(&key).await {
        tracing::warn!(client = %key, "rate limit exceeded");
        return Err(ApiError::too_many_requests("Rate limit exceeded, please try again later"));
    }
    Ok(next.run(request).await)
}
