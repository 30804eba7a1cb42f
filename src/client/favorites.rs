//! Local favorites store. Same persistence discipline as the cart store but
//! set semantics and no quantity, under the `favorites` key.

use super::storage::LocalStore;
use super::types::Product;

const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore {
    entries: Vec<Product>,
    store: LocalStore,
}

impl FavoritesStore {
    pub fn load(store: LocalStore) -> Self {
        let entries = store.get_json(FAVORITES_KEY).unwrap_or_default();
        Self { entries, store }
    }

    /// Idempotent: adding an already-favorited product is a no-op.
    pub fn add(&mut self, product: &Product) {
        if self.is_favorite(&product.id) {
            return;
        }
        self.entries.push(product.clone());
        self.persist();
    }

    pub fn remove(&mut self, product_id: &str) {
        self.entries.retain(|p| p.id != product_id);
        self.persist();
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.entries.iter().any(|p| p.id == product_id)
    }

    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        self.store.set_json(FAVORITES_KEY, &self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {id}"),
            description: String::new(),
            price: 10.0,
            discount_price: None,
            images: Vec::new(),
            category: "books".to_string(),
            rating: 0.0,
            review_count: 0,
            in_stock: true,
            specifications: HashMap::new(),
            installment_months: None,
            created_at: None,
        }
    }

    #[test]
    fn add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut favorites = FavoritesStore::load(LocalStore::new(dir.path()));

        favorites.add(&product("p1"));
        favorites.add(&product("p1"));

        assert_eq!(favorites.len(), 1);
        assert!(favorites.is_favorite("p1"));
    }

    #[test]
    fn remove_by_product_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut favorites = FavoritesStore::load(LocalStore::new(dir.path()));

        favorites.add(&product("p1"));
        favorites.add(&product("p2"));
        favorites.remove("p1");

        assert!(!favorites.is_favorite("p1"));
        assert!(favorites.is_favorite("p2"));
    }

    #[test]
    fn persists_under_its_own_key() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut favorites = FavoritesStore::load(LocalStore::new(dir.path()));
            favorites.add(&product("p1"));
        }

        // The cart key stays untouched
        assert!(dir.path().join("favorites.json").exists());
        assert!(!dir.path().join("bin.json").exists());

        let favorites = FavoritesStore::load(LocalStore::new(dir.path()));
        assert!(favorites.is_favorite("p1"));
    }
}
