//! Conversational assistant backed by a hosted generative model.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Domain context prepended to every user message.
pub const SYSTEM_CONTEXT: &str = "You are a cybersecurity assistant in the VulnTracker application. Your role is to help users with:
1. Understanding software vulnerabilities
2. Interpreting vulnerability data
3. Suggesting security best practices
4. Explaining patches and mitigation strategies
5. Providing insights about security threats

Keep your responses focused on cybersecurity topics and professional in tone.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat assistant is not configured")]
    NotConfigured,

    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Text generation capability used by the chat route.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, message: &str) -> Result<String, ChatError>;
}

/// The full prompt sent for one user message.
pub fn build_prompt(message: &str) -> String {
    format!("{}\n\nUser: {}", SYSTEM_CONTEXT, message)
}
