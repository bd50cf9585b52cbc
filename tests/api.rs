//! Router-level tests
//!
//! Drive the full router (gates, error mapping, layers) against an in-memory
//! database.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use storefront_backend::{
    api::{create_router, AppState},
    auth::{JwtHandler, PasswordHasher},
    store::Store,
};

const SECRET: &str = "integration-secret";

fn app() -> Router {
    let store = Arc::new(Store::in_memory().unwrap());
    let state = AppState::new(
        store,
        JwtHandler::new(SECRET, 1),
        PasswordHasher::new(4).unwrap(),
    );
    create_router(state, Duration::from_secs(10))
}

struct Reply {
    status: StatusCode,
    authorization: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let authorization = response
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    Reply {
        status,
        authorization,
        body,
    }
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> Reply {
    send(app, Method::GET, uri, None, token).await
}

async fn post(app: &Router, uri: &str, body: Value) -> Reply {
    send(app, Method::POST, uri, Some(body), None).await
}

/// Register `login` and return (user id, token)
async fn register_and_login(app: &Router, login: &str, is_admin: bool) -> (i64, String) {
    let created = post(
        app,
        "/users",
        json!({"login": login, "password": "secret123", "is_admin": is_admin}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["id"].as_i64().unwrap();

    let login = post(
        app,
        "/users/login",
        json!({"login": login, "password": "secret123"}),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.json()["token"].as_str().unwrap().to_string();
    (id, token)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let reply = get(&app, "/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert_eq!(reply.json()["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_widget_listing() {
    let app = app();

    let category = post(&app, "/category", json!({"title": "tools"})).await;
    assert_eq!(category.status, StatusCode::CREATED);
    assert_eq!(category.json(), json!({"id": 1, "title": "tools"}));

    let item = post(
        &app,
        "/item",
        json!({"title": "Widget", "price": 10, "category_id": 1}),
    )
    .await;
    assert_eq!(item.status, StatusCode::CREATED);

    let listed = get(&app, "/item/list", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(
        listed.json(),
        json!([{
            "id": 1,
            "title": "Widget",
            "description": "",
            "price": 10,
            "category_id": 1,
            "category_title": "tools"
        }])
    );

    let filtered = get(&app, "/item/list?category=1&search=Wid", None).await;
    assert_eq!(filtered.json().as_array().unwrap().len(), 1);

    let blank = get(&app, "/item/list?category=&search=", None).await;
    assert_eq!(blank.status, StatusCode::OK);
    assert_eq!(blank.json().as_array().unwrap().len(), 1);

    let miss = get(&app, "/item/list?search=gadget", None).await;
    assert_eq!(miss.json(), json!([]));

    let other_category = get(&app, "/item/list?category=2", None).await;
    assert_eq!(other_category.json(), json!([]));

    let bad = get(&app, "/item/list?category=abc", None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_validation() {
    let app = app();

    let unknown_category = post(
        &app,
        "/item",
        json!({"title": "Widget", "price": 10, "category_id": 42}),
    )
    .await;
    assert_eq!(unknown_category.status, StatusCode::BAD_REQUEST);

    let negative = post(&app, "/item", json!({"title": "Widget", "price": -1})).await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let missing_price = post(&app, "/item", json!({"title": "Widget"})).await;
    assert_eq!(missing_price.status, StatusCode::BAD_REQUEST);

    let bad_id = get(&app, "/item/abc", None).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.text(), "invalid id");

    // Missing rows surface as store failures
    let missing = get(&app, "/item/7", None).await;
    assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_category_deletion_keeps_items() {
    let app = app();
    post(&app, "/category", json!({"title": "tools"})).await;
    post(
        &app,
        "/item",
        json!({"title": "Hammer", "price": 15, "category_id": 1}),
    )
    .await;

    let deleted = send(&app, Method::DELETE, "/category/delete/1", None, None).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let item = get(&app, "/item/1", None).await;
    assert_eq!(item.status, StatusCode::OK);
    assert_eq!(item.json()["category_id"], Value::Null);
    assert_eq!(item.json()["category_title"], Value::Null);

    assert_eq!(get(&app, "/category/list", None).await.json(), json!([]));

    let again = send(&app, Method::DELETE, "/category/delete/1", None, None).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_returns_token_in_body_and_header() {
    let app = app();
    let registered = post(
        &app,
        "/users",
        json!({"login": "alice", "password": "secret123"}),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(
        registered.json(),
        json!({"id": 1, "login": "alice", "is_admin": false})
    );

    let ok = post(
        &app,
        "/users/login",
        json!({"login": "alice", "password": "secret123"}),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    let token = ok.json()["token"].as_str().unwrap().to_string();
    assert_eq!(ok.authorization, Some(format!("Bearer {}", token)));

    let wrong = post(
        &app,
        "/users/login",
        json!({"login": "alice", "password": "wrong"}),
    )
    .await;
    let unknown = post(
        &app,
        "/users/login",
        json!({"login": "nobody", "password": "secret123"}),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong.text(), unknown.text());

    let malformed = post(&app, "/users/login", json!({"login": "alice"})).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = app();
    let empty = post(&app, "/users", json!({"login": "", "password": "pw"})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    post(&app, "/users", json!({"login": "bob", "password": "pw"})).await;
    let duplicate = post(&app, "/users", json!({"login": "bob", "password": "pw"})).await;
    assert_eq!(duplicate.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_gated_user_routes() {
    let app = app();
    let (id, token) = register_and_login(&app, "alice", false).await;
    let uri = format!("/users/{}", id);

    assert_eq!(
        get(&app, &uri, None).await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        get(&app, &uri, Some("not-a-token")).await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let forged = JwtHandler::new("some-other-secret", 1).issue("alice").unwrap();
    assert_eq!(
        get(&app, &uri, Some(&forged)).await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let ghost = JwtHandler::new(SECRET, 1).issue("ghost").unwrap();
    assert_eq!(
        get(&app, &uri, Some(&ghost)).await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let me = get(&app, &uri, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json(), json!({"id": id, "login": "alice", "is_admin": false}));
    assert!(!me.text().contains("password"));

    let bad_id = get(&app, "/users/abc", Some(&token)).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    let cart = get(&app, &format!("/users/{}/cart", id), Some(&token)).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.json(), json!([]));
}

#[tokio::test]
async fn test_admin_order_listing() {
    let app = app();
    let (_, user_token) = register_and_login(&app, "alice", false).await;
    let (_, admin_token) = register_and_login(&app, "root", true).await;

    let refused = get(&app, "/order/list", Some(&user_token)).await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);

    let anonymous = get(&app, "/order/list", None).await;
    assert_eq!(anonymous.status, StatusCode::INTERNAL_SERVER_ERROR);

    let allowed = get(&app, "/order/list", Some(&admin_token)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.json(), json!([]));
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = app();
    let (user_id, token) = register_and_login(&app, "alice", false).await;
    post(&app, "/item", json!({"title": "Lamp", "price": 30})).await;
    post(&app, "/item", json!({"title": "Chair", "price": 80})).await;

    let created = post(
        &app,
        "/order",
        json!({"user_id": user_id, "items": [{"item_id": 1, "amount": 2}]}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let order = created.json();
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["status_id"], 1);
    assert_eq!(order["status_title"], "in progress");
    assert_eq!(order["items"][0]["item"]["title"], "Lamp");
    assert_eq!(order["items"][0]["amount"], 2);

    let unknown_item = post(
        &app,
        "/order",
        json!({"user_id": user_id, "items": [{"item_id": 99, "amount": 1}]}),
    )
    .await;
    assert_eq!(unknown_item.status, StatusCode::BAD_REQUEST);

    let zero_amount = post(
        &app,
        "/order",
        json!({"user_id": user_id, "items": [{"item_id": 1, "amount": 0}]}),
    )
    .await;
    assert_eq!(zero_amount.status, StatusCode::BAD_REQUEST);

    let update_uri = format!("/order/update/{}", order_id);
    let update_body = json!({
        "status_id": 2,
        "user_id": user_id,
        "items": [{"item_id": 2, "amount": 1}]
    });
    let anonymous = send(&app, Method::PUT, &update_uri, Some(update_body.clone()), None).await;
    assert_eq!(anonymous.status, StatusCode::INTERNAL_SERVER_ERROR);

    let updated = send(&app, Method::PUT, &update_uri, Some(update_body), Some(&token)).await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["status_title"], "ready");
    assert_eq!(updated["items"].as_array().unwrap().len(), 1);
    assert_eq!(updated["items"][0]["item"]["title"], "Chair");

    let mine = get(&app, &format!("/order/list/{}", user_id), Some(&token)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.json().as_array().unwrap().len(), 1);

    let fetched = get(&app, &format!("/order/{}", order_id), None).await;
    assert_eq!(fetched.json(), updated);

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/order/delete/{}", order_id),
        None,
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        get(&app, &format!("/order/{}", order_id), None).await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_user_deletion_removes_orders() {
    let app = app();
    let (user_id, _) = register_and_login(&app, "alice", false).await;
    let (_, admin_token) = register_and_login(&app, "root", true).await;
    post(&app, "/item", json!({"title": "Lamp", "price": 30})).await;
    post(
        &app,
        "/order",
        json!({"user_id": user_id, "items": [{"item_id": 1, "amount": 1}]}),
    )
    .await;

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/users/delete/{}", user_id),
        None,
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let orders = get(&app, "/order/list", Some(&admin_token)).await;
    assert_eq!(orders.json(), json!([]));

    let login = post(
        &app,
        "/users/login",
        json!({"login": "alice", "password": "secret123"}),
    )
    .await;
    assert_eq!(login.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slow_request_times_out_without_side_effects() {
    let store = Arc::new(Store::in_memory().unwrap());
    let hasher = PasswordHasher::new(12).unwrap();
    let impatient = create_router(
        AppState::new(Arc::clone(&store), JwtHandler::new(SECRET, 1), hasher.clone()),
        Duration::from_millis(1),
    );
    let patient = create_router(
        AppState::new(store, JwtHandler::new(SECRET, 1), hasher),
        Duration::from_secs(30),
    );

    // Hashing at cost 12 outlasts the timeout, so the insert never runs.
    let reply = post(
        &impatient,
        "/users",
        json!({"login": "slowpoke", "password": "secret123"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::REQUEST_TIMEOUT);

    let categories = get(&patient, "/category/list", None).await;
    assert_eq!(categories.status, StatusCode::OK);

    let login = post(
        &patient,
        "/users/login",
        json!({"login": "slowpoke", "password": "secret123"}),
    )
    .await;
    assert_eq!(login.status, StatusCode::BAD_REQUEST);
}
