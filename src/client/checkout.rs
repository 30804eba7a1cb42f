//! Checkout flow: Idle → Processing → Completed, or back to Idle on failure.
//!
//! The Idle→Processing transition is guarded — an empty cart redirects away
//! instead of ever entering Processing. On success the local cart is cleared
//! and the Completed state is held (with its order id) until [`reset`].
//!
//! [`reset`]: CheckoutFlow::reset

use super::api::ApiClient;
use super::cart::CartStore;
use super::error::ClientError;
use super::types::SnapshotItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Processing,
    Completed { order_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; navigate back to the cart page.
    RedirectToCart,
    Completed { order_id: String },
}

pub struct CheckoutFlow {
    state: CheckoutState,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self { state: CheckoutState::Idle }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Posts the cart snapshot as an order. The snapshot carries product ids
    /// and quantities only; the server recomputes the total from its own
    /// cart rows, so local prices are advisory.
    pub async fn place_order(
        &mut self,
        api: &ApiClient,
        cart: &mut CartStore,
    ) -> Result<CheckoutOutcome, ClientError> {
        if cart.is_empty() {
            return Ok(CheckoutOutcome::RedirectToCart);
        }

        self.state = CheckoutState::Processing;

        let snapshot: Vec<SnapshotItem> = cart
            .lines()
            .iter()
            .map(|line| SnapshotItem {
                product_id: line.product.id.clone(),
                quantity: line.quantity,
            })
            .collect();

        match api.checkout(&snapshot).await {
            Ok(created) => {
                cart.clear();
                self.state = CheckoutState::Completed { order_id: created.order_id.clone() };
                Ok(CheckoutOutcome::Completed { order_id: created.order_id })
            }
            Err(e) => {
                // Local cart is left untouched so the user can retry
                self.state = CheckoutState::Idle;
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }
}
