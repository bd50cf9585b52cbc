//! HTTP surface: shared state, router assembly and handlers

mod categories;
mod error;
mod items;
mod orders;
mod users;

pub use error::ApiError;

use crate::auth::{require_admin, require_user, GateState, JwtHandler, PasswordHasher};
use crate::middleware::request_logging;
use crate::services::{CategoryService, ItemService, OrderService, UserService};
use crate::store::Store;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub items: Arc<ItemService>,
    pub orders: Arc<OrderService>,
    pub tokens: Arc<JwtHandler>,
}

impl AppState {
    pub fn new(store: Arc<Store>, tokens: JwtHandler, hasher: PasswordHasher) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&store), hasher)),
            categories: Arc::new(CategoryService::new(Arc::clone(&store))),
            items: Arc::new(ItemService::new(Arc::clone(&store))),
            orders: Arc::new(OrderService::new(store)),
            tokens: Arc::new(tokens),
        }
    }

    fn gate(&self) -> GateState {
        GateState {
            tokens: Arc::clone(&self.tokens),
            directory: self.users.clone(),
        }
    }
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Build the full router: public, authenticated and admin routes behind the
/// shared timeout, logging and CORS layers
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let gate = state.gate();

    let public = Router::new()
        .route("/health", get(health))
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/delete/:id", delete(users::delete_user))
        .route("/category", post(categories::create_category))
        .route("/category/list", get(categories::list_categories))
        .route("/category/:id", get(categories::get_category))
        .route("/category/delete/:id", delete(categories::delete_category))
        .route("/item", post(items::create_item))
        .route("/item/list", get(items::list_items))
        .route("/item/:id", get(items::get_item))
        .route("/item/delete/:id", delete(items::delete_item))
        .route("/order", post(orders::create_order))
        .route("/order/:id", get(orders::get_order))
        .route("/order/delete/:id", delete(orders::delete_order));

    let authenticated = Router::new()
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/cart", get(users::get_cart))
        .route("/order/list/:id", get(orders::list_user_orders))
        .route("/order/update/:id", put(orders::update_order))
        .route_layer(middleware::from_fn_with_state(gate.clone(), require_user));

    let admin = Router::new()
        .route("/order/list", get(orders::list_orders))
        .route_layer(middleware::from_fn_with_state(gate, require_admin));

    public
        .merge(authenticated)
        .merge(admin)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
