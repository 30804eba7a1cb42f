pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod user;

use serde::Serialize;

/// `{data, message?}` wire envelope used by every success response.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data, message: None }
    }

    pub fn with_message(data: T, message: &'static str) -> Self {
        Self { data, message: Some(message) }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
