//! Local cart store.
//!
//! Holds the in-progress order for the current profile: at most one line per
//! product id, quantity always ≥ 1. Every mutation synchronously persists
//! the full line list under the `bin` key; construction rehydrates from that
//! key and falls back to an empty cart on missing or corrupt data.

use super::storage::LocalStore;
use super::types::{CartLine, Product};

const CART_KEY: &str = "bin";

pub struct CartStore {
    lines: Vec<CartLine>,
    store: LocalStore,
}

impl CartStore {
    pub fn load(store: LocalStore) -> Self {
        let lines = store.get_json(CART_KEY).unwrap_or_default();
        Self { lines, store }
    }

    /// Adds one unit of `product`. An existing line is incremented rather
    /// than duplicated. Never fails.
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine { product: product.clone(), quantity: 1 }),
        }
        self.persist();
    }

    /// Removes the line for `product_id`; no-op when absent.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product.id != product_id);
        self.persist();
    }

    /// Replaces a line's quantity. Returns `false` without mutating when
    /// `quantity` is zero or the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.lines.iter_mut().find(|l| l.product.id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Recomputed from the current lines on every call, never cached.
    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.product.effective_price() * f64::from(l.quantity))
            .sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.lines.iter().any(|l| l.product.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        self.store.set_json(CART_KEY, &self.lines);
    }
}
