//! # Cart State
//!
//! The vendor session's shopping cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Vendor Action            Command                 Cart State Change     │
//! │  ─────────────            ───────                 ─────────────────     │
//! │                                                                         │
//! │  Tap Product ────────────► add_to_cart() ───────► qty += 1 / insert    │
//! │                                                                         │
//! │  Change Quantity ────────► update_cart_item() ──► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Tap Remove ─────────────► remove_from_cart() ──► line removed         │
//! │                                                                         │
//! │  Place Order ────────────► place_order() ───────► cleared on success   │
//! │                                                                         │
//! │  View Cart ──────────────► get_cart() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use saathi_core::Cart;

/// Shared handle to a session's cart.
///
/// `Arc<Mutex<Cart>>` lets several commands hold the cart while only one
/// modifies it at a time. Cloning shares the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use saathi_app::state::CartState;
    ///
    /// let cart = CartState::new();
    /// assert_eq!(cart.with_cart(|c| c.item_count()), 0);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // A panic while holding the lock leaves a cart that is still valid
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}
