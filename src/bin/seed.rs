// src/bin/seed.rs - deterministic catalog seed: 40 products over 3 categories
use chrono::{Duration, TimeZone, Utc};
use dotenvy::dotenv;
use sqlx::types::Json;
use std::collections::HashMap;
use tracing::info;
use tracing_subscriber::fmt::init as tracing_init;

#[tokio::main]
async fn main() {
    tracing_init();
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:marketplace.db".to_string());
    let pool = marketplace::database::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    info!("Seeding products...");

    // Replace any previous catalog
    sqlx::query("DELETE FROM products")
        .execute(&pool)
        .await
        .expect("Failed to clear products");

    let categories = ["electronics", "books", "clothing"];
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for i in 0..40_i64 {
        let n = i + 1;
        let category = categories[(i % 3) as usize];
        let price = 100.0 + (i as f64) * 250.0;
        // Every fourth product carries a 20% discount
        let discount_price = (i % 4 == 0).then_some(price * 0.8);
        let mut specifications = HashMap::new();
        specifications.insert("sku".to_string(), format!("SKU-{n:04}"));

        sqlx::query(
            "INSERT INTO products (id, title, description, price, discount_price, images, \
             category, rating, review_count, in_stock, specifications, installment_months, \
             created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(format!("seed-{n:04}"))
        .bind(format!("Product {n} ({category})"))
        .bind(format!("This is a description for product {n}"))
        .bind(price)
        .bind(discount_price)
        .bind(Json(vec![format!("https://via.placeholder.com/400?text=Product+{n}")]))
        .bind(category)
        .bind(3.0 + ((i % 5) as f64) * 0.5)
        .bind(n * 3)
        .bind(true)
        .bind(Json(specifications))
        .bind((i % 6 == 0).then_some(12_i64))
        .bind(base + Duration::minutes(i))
        .execute(&pool)
        .await
        .expect("Failed to insert product");
    }

    info!("Created 40 products");
}
