// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalog reads are open so the dashboard can render before login.

pub mod auth;
pub mod catalog;
pub mod system;
