//! Debounce-gated autocomplete.
//!
//! Each keystroke calls [`Autocomplete::input`]; the request is only issued
//! once the debounce window passes without a newer keystroke. A generation
//! counter is checked both after the debounce and after the response, so a
//! superseded query never overwrites newer suggestions — stale calls resolve
//! to `Ok(None)`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::api::{ApiClient, ListParams};
use super::error::ClientError;
use super::types::Product;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
const SUGGESTION_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct Autocomplete {
    generation: Arc<AtomicU64>,
    debounce: Duration,
    limit: i64,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Autocomplete {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            debounce,
            limit: SUGGESTION_LIMIT,
        }
    }

    /// Registers a keystroke and, if it is still the newest once the
    /// debounce elapses, fetches suggestions. Returns `Ok(None)` when the
    /// call was superseded by a newer keystroke at either guard point.
    pub async fn input(
        &self,
        api: &ApiClient,
        query: &str,
    ) -> Result<Option<Vec<Product>>, ClientError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(None);
        }

        let page = api
            .list_products(&ListParams {
                q: Some(query.to_string()),
                limit: Some(self.limit),
                ..ListParams::default()
            })
            .await?;

        // The response may have raced a newer keystroke; drop it if so
        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(None);
        }

        Ok(Some(page.data))
    }
}
