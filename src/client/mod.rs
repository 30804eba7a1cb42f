//! Client SDK for the storefront API.
//!
//! The stores ([`cart::CartStore`], [`favorites::FavoritesStore`]) hold the
//! browser-profile state and persist every mutation through a
//! [`storage::LocalStore`]; [`api::ApiClient`] carries the bearer token and
//! talks to the HTTP surface; [`checkout::CheckoutFlow`] drives the
//! idle/processing/completed order flow.

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod favorites;
pub mod search;
pub mod storage;
pub mod types;
