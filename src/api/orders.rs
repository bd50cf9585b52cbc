//! Order endpoints

use super::{ApiError, AppState};
use crate::auth::CurrentUser;
use crate::models::{NewOrder, Order};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use tracing::info;

/// POST /order
pub async fn create_order(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewOrder>, ApiError>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let order = state.orders.create(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /order/:id
pub async fn get_order(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get(id).await?))
}

/// GET /order/list (admin)
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list().await?))
}

/// GET /order/list/:id
pub async fn list_user_orders(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.list_by_user(user_id).await?))
}

/// PUT /order/update/:id
pub async fn update_order(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<NewOrder>, ApiError>,
) -> Result<Json<Order>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let order = state.orders.update(id, payload).await?;
    info!("updated order {} (by user {})", order.id, caller.id);
    Ok(Json(order))
}

/// DELETE /order/delete/:id
pub async fn delete_order(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    if state.orders.delete(id).await? {
        info!("deleted order with id {}", id);
    }
    Ok(StatusCode::OK)
}
