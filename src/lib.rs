pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod graph;
pub mod handlers;
pub mod middleware;

pub use app::{app, AppState};
