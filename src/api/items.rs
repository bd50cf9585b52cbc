//! Item endpoints

use super::{ApiError, AppState};
use crate::filter::ItemFilter;
use crate::models::{Item, NewItem};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

/// POST /item
pub async fn create_item(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewItem>, ApiError>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let item = state.items.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /item/:id
pub async fn get_item(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.items.get(id).await?))
}

/// GET /item/list?category=&search=
pub async fn list_items(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<ItemFilter>, ApiError>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.items.list(&filter).await?;
    debug!(?filter, count = items.len(), "listed items");
    Ok(Json(items))
}

/// DELETE /item/delete/:id
pub async fn delete_item(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if state.items.delete(id).await? {
        info!("deleted item with id {}", id);
    }
    Ok(StatusCode::OK)
}
