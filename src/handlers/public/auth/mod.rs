// handlers/public/auth/mod.rs - Token acquisition endpoints

use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenUser {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: TokenUser,
    pub expires_in: u64,
}

impl Credentials {
    /// Trimmed email and raw password, both required.
    fn require(self) -> Result<(String, String), ApiError> {
        let email = self.email.map(|e| e.trim().to_string()).unwrap_or_default();
        let password = self.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::bad_request("Email and password are required"));
        }
        Ok((email, password))
    }
}

fn issue_token(email: String, user_id: uuid::Uuid) -> Result<TokenResponse, ApiError> {
    let claims = Claims::new(email.clone(), user_id);
    let token = generate_jwt(&claims)?;
    Ok(TokenResponse {
        token,
        user: TokenUser { email },
        expires_in: (claims.exp - claims.iat).max(0) as u64,
    })
}
