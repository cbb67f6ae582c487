// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind jwt_auth_middleware, which puts AuthUser in the
// request extensions.

pub mod auth;
pub mod chat;
pub mod patches;
pub mod software;
pub mod threat_types;
pub mod threats;
pub mod utils;
pub mod vendors;
pub mod vulnerabilities;
