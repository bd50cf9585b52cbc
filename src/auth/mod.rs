//! Authentication Module
//! Password hashing, JWT issuance and the request gate protecting routes

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::JwtHandler;
pub use middleware::{require_admin, require_user, AuthError, GateState, UserDirectory};
pub use models::{Claims, CurrentUser, LoginRequest, LoginResponse};
pub use password::PasswordHasher;
