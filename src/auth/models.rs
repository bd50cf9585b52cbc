//! Authentication Models

use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (login)
    pub iat: i64,
    pub exp: i64, // expiration timestamp
}

/// Login request body
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Caller identity attached to gated requests
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);
