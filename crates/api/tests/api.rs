//! End-to-end router tests over the in-memory stores.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use jengamart_api::app::services::build_services;
use jengamart_api::app::{AppConfig, AppServices, build_router};

fn config() -> AppConfig {
    AppConfig {
        session_secret: "test-secret".to_string(),
        database_url: None,
        admin_email: None,
    }
}

async fn setup() -> (Router, Arc<AppServices>) {
    let services = Arc::new(build_services(config()).await.unwrap());
    (build_router(services.clone()), services)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn request_json(
    app: &Router,
    method: &str,
    path: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn register_and_login(app: &Router, username: &str, email: &str) -> String {
    let (status, _) = request_json(
        app,
        "POST",
        "/auth/register",
        json!({
            "username": username,
            "email": email,
            "password": "hunter2",
            "confirm_password": "hunter2",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request_json(
        app,
        "POST",
        "/auth/login",
        json!({ "email": email, "password": "hunter2" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn search_returns_direct_matches_without_suggestion() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/catalog/products?search=cement", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 4);
    assert!(body["suggestion"].is_null());
    // One group per category, empties included.
    assert_eq!(body["groups"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn search_suggests_on_typo() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/catalog/products?search=bambri", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["suggestion"]["text"], "Bamburi Nguvu Cement 50kg");
    assert_eq!(body["suggestion"]["redirect"]["search"], "Bamburi Nguvu Cement 50kg");
    assert!(body["suggestion"]["redirect"]["category"].is_null());
}

#[tokio::test]
async fn search_with_nonsense_query_suggests_nothing() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/catalog/products?search=xyz123nonsense", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert!(body["suggestion"].is_null());
}

#[tokio::test]
async fn malformed_category_id_is_rejected() {
    let (app, _) = setup().await;
    let (status, body) = get(&app, "/catalog/products?category=not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn unknown_category_id_filters_everything() {
    let (app, _) = setup().await;
    let path = format!("/catalog/products?category={}", uuid_like());
    let (status, body) = get(&app, &path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert!(body["suggestion"].is_null());
}

fn uuid_like() -> String {
    jengamart_core::CategoryId::new().to_string()
}

#[tokio::test]
async fn featured_and_categories_reflect_the_seed() {
    let (app, _) = setup().await;

    let (status, body) = get(&app, "/catalog/featured", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    let (status, body) = get(&app, "/catalog/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["AGGREGATES", "CEMENT", "ELECTRICAL", "PLUMBING", "STEEL", "WOOD"]);
}

#[tokio::test]
async fn product_detail_includes_related_from_same_category() {
    let (app, _) = setup().await;
    let (_, listing) = get(&app, "/catalog/products?search=cement", None).await;
    let first = &listing["items"][0];
    let id = first["id"].as_str().unwrap();

    let (status, body) = get(&app, &format!("/catalog/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["id"], *id);
    let related = body["related"].as_array().unwrap();
    assert!(related.len() <= 4);
    assert!(related.iter().all(|p| p["id"] != *id));
    assert!(
        related
            .iter()
            .all(|p| p["category_id"] == first["category_id"])
    );
}

#[tokio::test]
async fn product_detail_errors() {
    let (app, _) = setup().await;

    let (status, body) = get(&app, "/catalog/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");

    let (status, body) = get(&app, &format!("/catalog/products/{}", uuid_like()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn registration_validations() {
    let (app, _) = setup().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/auth/register",
        json!({
            "username": "fundi",
            "email": "fundi@example.com",
            "password": "hunter2",
            "confirm_password": "different",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    register_and_login(&app, "fundi", "fundi@example.com").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/auth/register",
        json!({
            "username": "fundi",
            "email": "other@example.com",
            "password": "hunter2",
            "confirm_password": "hunter2",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _) = setup().await;
    register_and_login(&app, "fundi", "fundi@example.com").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/auth/login",
        json!({ "email": "fundi@example.com", "password": "wrong" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, _) = request_json(
        &app,
        "POST",
        "/auth/login",
        json!({ "email": "nobody@example.com", "password": "hunter2" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_and_reflects_a_session() {
    let (app, _) = setup().await;

    let (status, _) = get(&app, "/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/auth/me", Some("garbage-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register_and_login(&app, "fundi", "fundi@example.com").await;
    let (status, body) = get(&app, "/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "fundi");
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn cart_flow() {
    let (app, _) = setup().await;
    let token = register_and_login(&app, "fundi", "fundi@example.com").await;

    let (status, _) = get(&app, "/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&app, "/cart", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 0.0);

    let (_, listing) = get(&app, "/catalog/products?search=cement", None).await;
    let id = listing["items"][0]["id"].as_str().unwrap().to_string();
    let price = listing["items"][0]["price"].as_f64().unwrap();

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/cart/items/{}", uuid_like()),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        request_json(&app, "POST", &format!("/cart/items/{id}"), json!({}), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"].as_f64().unwrap(), price);

    // Quantity is fixed at one; re-adding does not duplicate.
    let (_, body) =
        request_json(&app, "POST", &format!("/cart/items/{id}"), json!({}), Some(&token)).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) =
        request_json(&app, "DELETE", &format!("/cart/items/{id}"), json!({}), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_routes_enforce_the_live_admin_flag() {
    let (app, services) = setup().await;
    let token = register_and_login(&app, "fundi", "fundi@example.com").await;

    let (status, _) = get(&app, "/admin/products", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/admin/products", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Promotion takes effect without re-issuing the token.
    let user = services
        .users
        .find_by_email("fundi@example.com")
        .await
        .unwrap()
        .unwrap();
    services.users.grant_admin(user.id).await.unwrap();

    let (status, body) = get(&app, "/admin/products", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 18);
    // Dashboard listing carries category names and sorts by product name.
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(body["items"][0]["category_name"], "AGGREGATES");
}

async fn admin_token(app: &Router, services: &AppServices) -> String {
    let token = register_and_login(app, "admin", "admin@example.com").await;
    let user = services
        .users
        .find_by_email("admin@example.com")
        .await
        .unwrap()
        .unwrap();
    services.users.grant_admin(user.id).await.unwrap();
    token
}

#[tokio::test]
async fn admin_product_crud() {
    let (app, services) = setup().await;
    let token = admin_token(&app, &services).await;

    let (_, categories) = get(&app, "/catalog/categories", None).await;
    let cement = categories["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "CEMENT")
        .unwrap();
    let category_id = cement["id"].as_str().unwrap().to_string();

    let payload = json!({
        "name": "Savannah Cement 42.5N 50kg",
        "category_id": category_id,
        "price": 980.0,
        "featured": true,
    });
    let (status, created) =
        request_json(&app, "POST", "/admin/products", payload.clone(), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    // Duplicate name is a conflict.
    let (status, body) =
        request_json(&app, "POST", "/admin/products", payload.clone(), Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // Invalid price is a validation error.
    let (status, body) = request_json(
        &app,
        "POST",
        "/admin/products",
        json!({ "name": "Broken", "category_id": created["category_id"], "price": -5.0 }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let update = json!({
        "name": "Savannah Cement 42.5N 50kg",
        "category_id": created["category_id"],
        "price": 1000.0,
        "featured": false,
    });
    let (status, updated) = request_json(
        &app,
        "PUT",
        &format!("/admin/products/{id}"),
        update.clone(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 1000.0);

    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/admin/products/{}", uuid_like()),
        update,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request_json(
        &app,
        "DELETE",
        &format!("/admin/products/{id}"),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"]["id"], *id);

    let (status, _) = get(&app, &format!("/catalog/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_category_and_bulk_updates() {
    let (app, services) = setup().await;
    let token = admin_token(&app, &services).await;

    let (status, first) = request_json(
        &app,
        "POST",
        "/admin/categories",
        json!({ "name": "ROOFING" }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = request_json(
        &app,
        "POST",
        "/admin/categories",
        json!({ "name": "ROOFING" }),
        Some(&token),
    )
    .await;
    assert_eq!(first["id"], second["id"]);

    let (status, body) = request_json(
        &app,
        "POST",
        "/admin/categories",
        json!({ "name": "   " }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = request_json(
        &app,
        "POST",
        "/admin/products/bulk/featured",
        json!({ "featured": true }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 18);

    // Out of range either way is rejected; 1e308 would overflow stored
    // prices to infinity.
    for percent in [-150.0, 1e308] {
        let (status, body) = request_json(
            &app,
            "POST",
            "/admin/products/bulk/prices",
            json!({ "percent": percent }),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    let (status, body) = request_json(
        &app,
        "POST",
        "/admin/products/bulk/prices",
        json!({ "percent": 10.0 }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 18);
}

#[tokio::test]
async fn admin_can_promote_users() {
    let (app, services) = setup().await;
    let token = admin_token(&app, &services).await;
    register_and_login(&app, "fundi", "fundi@example.com").await;

    let user = services
        .users
        .find_by_email("fundi@example.com")
        .await
        .unwrap()
        .unwrap();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/admin/users/{}/promote", user.id),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], true);

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/admin/users/{}/promote", uuid_like()),
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
