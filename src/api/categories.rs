//! Category endpoints

use super::{ApiError, AppState};
use crate::models::{Category, NewCategory};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;

/// POST /category
pub async fn create_category(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewCategory>, ApiError>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let category = state.categories.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /category/:id
pub async fn get_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.categories.get(id).await?))
}

/// GET /category/list
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories.list().await?))
}

/// DELETE /category/delete/:id
pub async fn delete_category(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if state.categories.delete(id).await? {
        info!("deleted category with id {}", id);
    }
    Ok(StatusCode::OK)
}
