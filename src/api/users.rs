//! User endpoints

use super::{ApiError, AppState};
use crate::auth::{CurrentUser, LoginRequest, LoginResponse};
use crate::models::{ItemLine, NewUser, User};
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info, warn};

/// POST /users
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let user = state.users.create_user(payload).await?;
    info!("👤 Registered user {} ({})", user.login, user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    info!("🔐 Login attempt: {}", payload.login);

    let user = match state.users.authenticate(&payload.login, &payload.password).await {
        Ok(user) => user,
        Err(e) => {
            warn!("❌ Failed login attempt: {}", payload.login);
            return Err(e.into());
        }
    };

    let token = state.tokens.issue(&user.login)?;
    info!("✅ Login successful: {}", user.login);

    Ok((
        [(AUTHORIZATION, format!("Bearer {}", token))],
        Json(LoginResponse { token }),
    ))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<User>, ApiError> {
    debug!(caller = caller.id, user_id = id, "fetching user");
    Ok(Json(state.users.get_user(id).await?))
}

/// GET /users/:id/cart
pub async fn get_cart(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Vec<ItemLine>>, ApiError> {
    Ok(Json(state.users.cart(id).await?))
}

/// DELETE /users/delete/:id
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if state.users.delete_user(id).await? {
        info!("deleted user with id {}", id);
    }
    Ok(StatusCode::OK)
}
