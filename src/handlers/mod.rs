// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth): catalog reads, token acquisition, service info
// Protected (JWT auth): every write, chat, whoami

pub mod public;
pub mod protected;
