//! Route tests driving the real router against an in-memory SQLite pool.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Once;
use tower::ServiceExt;

use marketplace::routes;
use marketplace::state::AppState;

fn init_env() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| std::env::set_var("JWT_SECRET", "test-secret-key"));
}

async fn test_pool() -> SqlitePool {
    // One connection with no recycling, or the in-memory database vanishes
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    sqlx::migrate!().run(&pool).await.expect("run migrations");
    pool
}

async fn test_app() -> (Router, SqlitePool) {
    init_env();
    let pool = test_pool().await;
    let app = routes::create_router().with_state(AppState::new(pool.clone()));
    (app, pool)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

async fn seed_product(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    category: &str,
    price: f64,
    discount_price: Option<f64>,
    in_stock: bool,
    minutes_offset: i64,
) {
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        + Duration::minutes(minutes_offset);
    sqlx::query(
        "INSERT INTO products (id, title, description, price, discount_price, images, category, \
         rating, review_count, in_stock, specifications, installment_months, created_at) \
         VALUES (?, ?, ?, ?, ?, '[]', ?, 4.0, 10, ?, '{}', NULL, ?)",
    )
    .bind(id)
    .bind(title)
    .bind(format!("Description of {title}"))
    .bind(price)
    .bind(discount_price)
    .bind(category)
    .bind(in_stock)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("seed product");
}

async fn register_user(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["token"].as_str().expect("token").to_string()
}

// ---- auth ----

#[tokio::test]
async fn register_returns_token_and_user() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "A", "email": "a@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert_eq!(body["message"], "User registered successfully");
}

#[tokio::test]
async fn register_rejects_short_password_empty_name_and_bad_email() {
    let (app, _pool) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "  ", "email": "a@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ann", "email": "a@x.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ann", "email": "not-an-email", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (app, _pool) = test_app().await;
    register_user(&app, "Ann", "dup@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Bob", "email": "dup@x.com", "password": "secret2" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists with this email");
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_credential_was_wrong() {
    let (app, _pool) = test_app().await;
    register_user(&app, "Ann", "ann@x.com").await;

    let (wrong_pw_status, wrong_pw_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ann@x.com", "password": "wrong-pass" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Identical bodies, no user enumeration
    assert_eq!(wrong_pw_body, unknown_body);
    assert_eq!(wrong_pw_body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let (app, _pool) = test_app().await;
    register_user(&app, "Ann", "login@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "login@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["name"], "Ann");
}

#[tokio::test]
async fn profile_requires_and_honors_the_token() {
    let (app, _pool) = test_app().await;
    let token = register_user(&app, "Ann", "profile@x.com").await;

    let (status, _) = send(&app, "GET", "/api/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "profile@x.com");
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let (app, _pool) = test_app().await;
    let mut token = register_user(&app, "Ann", "tamper@x.com").await;
    token.push('x');

    let (status, body) = send(&app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

// ---- products ----

#[tokio::test]
async fn category_filter_paginates_with_totals() {
    let (app, pool) = test_app().await;
    for i in 0..5 {
        seed_product(&pool, &format!("e{i}"), &format!("Gadget {i}"), "electronics", 100.0, None, true, i).await;
    }
    for i in 0..3 {
        seed_product(&pool, &format!("b{i}"), &format!("Book {i}"), "books", 20.0, None, true, 10 + i).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/products?category=electronics&page=1&limit=2",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
}

#[tokio::test]
async fn list_defaults_to_page_1_limit_40_newest_first() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "old", "Old product", "books", 10.0, None, true, 0).await;
    seed_product(&pool, "new", "New product", "books", 10.0, None, true, 60).await;

    let (status, body) = send(&app, "GET", "/api/products", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 40);
    assert_eq!(body["data"][0]["id"], "new");
    assert_eq!(body["data"][1]["id"], "old");
}

#[tokio::test]
async fn text_query_matches_title_or_description_case_insensitively() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "p1", "Wireless Keyboard", "electronics", 50.0, None, true, 0).await;
    seed_product(&pool, "p2", "Mouse", "electronics", 30.0, None, true, 1).await;
    seed_product(&pool, "p3", "Novel", "books", 15.0, None, true, 2).await;

    let (status, body) = send(&app, "GET", "/api/products?q=KEYBOARD", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], "p1");

    // Matches the generated description text as well
    let (_, body) = send(&app, "GET", "/api/products?q=description+of", None, None).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn sort_whitelist_falls_back_to_created_at() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "cheap", "Cheap", "books", 5.0, None, true, 0).await;
    seed_product(&pool, "pricey", "Pricey", "books", 500.0, None, true, 1).await;

    let (status, body) = send(&app, "GET", "/api/products?sortBy=price&sortOrder=asc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "cheap");

    // Unknown sort field must not be interpolated; default newest-first applies
    let (status, body) = send(
        &app,
        "GET",
        "/api/products?sortBy=price;%20DROP%20TABLE%20products&sortOrder=asc",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "pricey");
}

#[tokio::test]
async fn product_detail_and_missing_product() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "p1", "Gadget", "electronics", 99.0, Some(79.0), true, 0).await;

    let (status, body) = send(&app, "GET", "/api/products/p1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Gadget");
    assert_eq!(body["data"]["discountPrice"], 79.0);
    assert_eq!(body["data"]["inStock"], true);

    let (status, body) = send(&app, "GET", "/api/products/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

// ---- cart ----

#[tokio::test]
async fn cart_requires_token_then_holds_one_line() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "cart@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/cart",
        None,
        Some(json!({ "productId": "P1", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "P1", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["quantity"], 1);
    assert_eq!(body["data"]["product"]["id"], "P1");

    let (status, body) = send(&app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let lines = body["data"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 1);
}

#[tokio::test]
async fn adding_the_same_product_twice_merges_quantities() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "merge@x.com").await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/cart",
            Some(&token),
            Some(json!({ "productId": "P1", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, "GET", "/api/cart", Some(&token), None).await;
    let lines = body["data"].as_array().unwrap();
    assert_eq!(lines.len(), 1, "expected one merged line, not two");
    assert_eq!(lines[0]["quantity"], 2);
}

#[tokio::test]
async fn cart_rejects_unknown_product_and_out_of_stock() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "gone", "Sold out", "electronics", 10.0, None, false, 0).await;
    let token = register_user(&app, "Ann", "stock@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "missing", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "gone", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product is out of stock");
}

#[tokio::test]
async fn quantity_below_one_is_rejected() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "qty@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "P1", "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "P1" })),
    )
    .await;
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/cart/{item_id}"),
        Some(&token),
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The line is unchanged after the rejected update
    let (_, body) = send(&app, "GET", "/api/cart", Some(&token), None).await;
    assert_eq!(body["data"][0]["quantity"], 1);
}

#[tokio::test]
async fn patch_and_delete_are_scoped_to_the_owner() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let owner = register_user(&app, "Ann", "owner@x.com").await;
    let intruder = register_user(&app, "Bob", "intruder@x.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&owner),
        Some(json!({ "productId": "P1" })),
    )
    .await;
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/cart/{item_id}"),
        Some(&intruder),
        Some(json!({ "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart item not found");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/cart/{item_id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Owner still sees the untouched line, then removes it
    let (_, body) = send(&app, "GET", "/api/cart", Some(&owner), None).await;
    assert_eq!(body["data"][0]["quantity"], 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/cart/{item_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/cart", Some(&owner), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn patch_replaces_the_quantity() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "patch@x.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/cart",
        Some(&token),
        Some(json!({ "productId": "P1", "quantity": 2 })),
    )
    .await;
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/cart/{item_id}"),
        Some(&token),
        Some(json!({ "quantity": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 7);
    assert_eq!(body["message"], "Cart item updated successfully");
}

// ---- favorites ----

#[tokio::test]
async fn favorite_add_is_set_semantics_with_conflict_on_repeat() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "P1", "Gadget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "fav@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({ "productId": "P1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let favorite_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({ "productId": "P1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Product already in favorites");

    let (_, body) = send(&app, "GET", "/api/favorites", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/favorites/{favorite_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/favorites", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn favoriting_an_unknown_product_is_not_found() {
    let (app, _pool) = test_app().await;
    let token = register_user(&app, "Ann", "fav404@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({ "productId": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---- checkout ----

#[tokio::test]
async fn checkout_snapshots_prices_and_clears_the_cart() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "A", "Widget", "electronics", 100.0, None, true, 0).await;
    seed_product(&pool, "B", "Gizmo", "electronics", 250.0, Some(200.0), true, 1).await;
    let token = register_user(&app, "Ann", "order@x.com").await;

    send(&app, "POST", "/api/cart", Some(&token), Some(json!({ "productId": "A", "quantity": 1 }))).await;
    send(&app, "POST", "/api/cart", Some(&token), Some(json!({ "productId": "B", "quantity": 2 }))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(&token),
        Some(json!({ "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"]["orderId"].as_str().unwrap().to_string();

    // 100*1 + 200*2 — the discount price is the effective price
    let (_, body) = send(&app, "GET", "/api/checkout", Some(&token), None).await;
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.as_str());
    assert_eq!(orders[0]["total"], 500.0);
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/cart", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty(), "cart must be cleared");
}

#[tokio::test]
async fn checkout_with_an_empty_cart_is_a_bad_request() {
    let (app, _pool) = test_app().await;
    let token = register_user(&app, "Ann", "empty@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(&token),
        Some(json!({ "items": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn checkout_ignores_client_supplied_prices() {
    let (app, pool) = test_app().await;
    seed_product(&pool, "A", "Widget", "electronics", 100.0, None, true, 0).await;
    let token = register_user(&app, "Ann", "tamper-price@x.com").await;

    send(&app, "POST", "/api/cart", Some(&token), Some(json!({ "productId": "A", "quantity": 1 }))).await;

    // A tampered snapshot claiming a different price and quantity
    let (status, _) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(&token),
        Some(json!({ "items": [{ "productId": "A", "quantity": 99, "price": 0.01 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/checkout", Some(&token), None).await;
    assert_eq!(body["data"][0]["total"], 100.0);
    assert_eq!(body["data"][0]["items"][0]["quantity"], 1);
}

// ---- surface ----

#[tokio::test]
async fn health_and_fallback() {
    let (app, _pool) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api/unknown-route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
}
