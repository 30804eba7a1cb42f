//! HTTP client for the storefront API.
//!
//! Wraps `reqwest` with typed methods mirroring the server routes. Holds an
//! optional bearer token and attaches it as `Authorization: Bearer <token>`
//! on every request once installed. Non-2xx responses are mapped to
//! [`ClientError::Api`] using the body's `message` field.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ClientError;
use super::types::{
    AuthData, CartItem, Favorite, Order, OrderCreated, Product, ProductPage, SnapshotItem,
    UserSummary,
};

const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Query parameters for the product list route. Unset fields are omitted and
/// take the server defaults (page 1, limit 40, newest first).
#[derive(Debug, Default, Clone)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiClient {
    /// Client pointed at the default local server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client with a custom base URL (for tests against a mock or spawned
    /// server).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &'static str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                });
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize { context, source: e })
    }

    // ---- auth ----

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthData, ClientError> {
        let response = self
            .request(Method::POST, "/api/auth/register")
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let envelope: Envelope<AuthData> = Self::handle(response, "register").await?;
        Ok(envelope.data)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData, ClientError> {
        let response = self
            .request(Method::POST, "/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let envelope: Envelope<AuthData> = Self::handle(response, "login").await?;
        Ok(envelope.data)
    }

    pub async fn profile(&self) -> Result<UserSummary, ClientError> {
        let response = self.request(Method::GET, "/api/auth/profile").send().await?;
        let envelope: Envelope<UserSummary> = Self::handle(response, "profile").await?;
        Ok(envelope.data)
    }

    // ---- catalog ----

    pub async fn list_products(&self, params: &ListParams) -> Result<ProductPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(q) = &params.q {
            query.push(("q", q.clone()));
        }
        if let Some(category) = &params.category {
            query.push(("category", category.clone()));
        }
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(sort_by) = &params.sort_by {
            query.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = &params.sort_order {
            query.push(("sortOrder", sort_order.clone()));
        }

        let response = self
            .request(Method::GET, "/api/products")
            .query(&query)
            .send()
            .await?;
        Self::handle(response, "list_products").await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        let response = self
            .request(Method::GET, &format!("/api/products/{id}"))
            .send()
            .await?;
        let envelope: Envelope<Product> = Self::handle(response, "get_product").await?;
        Ok(envelope.data)
    }

    // ---- cart ----

    pub async fn cart(&self) -> Result<Vec<CartItem>, ClientError> {
        let response = self.request(Method::GET, "/api/cart").send().await?;
        let envelope: Envelope<Vec<CartItem>> = Self::handle(response, "cart").await?;
        Ok(envelope.data)
    }

    pub async fn add_to_cart(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartItem, ClientError> {
        let response = self
            .request(Method::POST, "/api/cart")
            .json(&serde_json::json!({ "productId": product_id, "quantity": quantity }))
            .send()
            .await?;
        let envelope: Envelope<CartItem> = Self::handle(response, "add_to_cart").await?;
        Ok(envelope.data)
    }

    pub async fn update_quantity(
        &self,
        item_id: &str,
        quantity: u32,
    ) -> Result<CartItem, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("/api/cart/{item_id}"))
            .json(&serde_json::json!({ "quantity": quantity }))
            .send()
            .await?;
        let envelope: Envelope<CartItem> = Self::handle(response, "update_quantity").await?;
        Ok(envelope.data)
    }

    pub async fn remove_cart_item(&self, item_id: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/api/cart/{item_id}"))
            .send()
            .await?;
        let _: serde_json::Value = Self::handle(response, "remove_cart_item").await?;
        Ok(())
    }

    // ---- favorites ----

    pub async fn favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        let response = self.request(Method::GET, "/api/favorites").send().await?;
        let envelope: Envelope<Vec<Favorite>> = Self::handle(response, "favorites").await?;
        Ok(envelope.data)
    }

    pub async fn add_favorite(&self, product_id: &str) -> Result<Favorite, ClientError> {
        let response = self
            .request(Method::POST, "/api/favorites")
            .json(&serde_json::json!({ "productId": product_id }))
            .send()
            .await?;
        let envelope: Envelope<Favorite> = Self::handle(response, "add_favorite").await?;
        Ok(envelope.data)
    }

    pub async fn remove_favorite(&self, favorite_id: &str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/api/favorites/{favorite_id}"))
            .send()
            .await?;
        let _: serde_json::Value = Self::handle(response, "remove_favorite").await?;
        Ok(())
    }

    // ---- checkout ----

    pub async fn checkout(&self, items: &[SnapshotItem]) -> Result<OrderCreated, ClientError> {
        let response = self
            .request(Method::POST, "/api/checkout")
            .json(&serde_json::json!({ "items": items }))
            .send()
            .await?;
        let envelope: Envelope<OrderCreated> = Self::handle(response, "checkout").await?;
        Ok(envelope.data)
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ClientError> {
        let response = self.request(Method::GET, "/api/checkout").send().await?;
        let envelope: Envelope<Vec<Order>> = Self::handle(response, "orders").await?;
        Ok(envelope.data)
    }
}
