//! Authorization Gate
//! Resolves the bearer token on a request to a stored user before the
//! wrapped handler runs

use crate::auth::{jwt::JwtHandler, models::CurrentUser};
use crate::models::User;
use crate::store::StoreError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Lookup of callers by login
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
}

/// State shared by both gate variants
#[derive(Clone)]
pub struct GateState {
    pub tokens: Arc<JwtHandler>,
    pub directory: Arc<dyn UserDirectory>,
}

/// Auth error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed authorization header")]
    MissingCredential,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token subject missing or not a string")]
    MalformedClaims,
    #[error("unknown user")]
    UnknownUser,
    #[error("user lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!(error = %self, "authorization failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Token from an `Authorization: Bearer <token>` header; the scheme is
/// matched case-insensitively
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AuthError::MissingCredential),
    }
}

/// Resolve the caller behind the request headers
pub async fn authenticate(gate: &GateState, headers: &HeaderMap) -> Result<User, AuthError> {
    let token = bearer_token(headers)?;
    let login = gate.tokens.verify(token)?;
    let user = gate
        .directory
        .find_by_login(&login)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    debug!(user_id = user.id, "request authenticated");
    Ok(user)
}

/// Gate for routes open to any registered user
pub async fn require_user(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&gate, req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Gate for admin-only routes
pub async fn require_admin(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&gate, req.headers()).await?;
    if !user.is_admin {
        debug!(user_id = user.id, "admin route refused");
        return Ok((StatusCode::FORBIDDEN, "admin access required").into_response());
    }
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
