//! # Cart
//!
//! The shopping cart of a single vendor session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Vendor Action            Operation               Cart Change           │
//! │  ─────────────            ─────────               ───────────           │
//! │                                                                         │
//! │  Tap product ────────────► add_item() ──────────► qty + 1 or new line  │
//! │                                                                         │
//! │  + / - buttons ──────────► update_quantity() ───► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Remove ─────────────────► remove_item() ───────► line deleted         │
//! │                                                                         │
//! │  Order placed ───────────► clear() ─────────────► empty                │
//! │                                                                         │
//! │  Cart tab / badge ───────► total_cost(), item_count() (read only)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of the operations fail. Unknown product ids are silently ignored so a
//! double-tap on "remove" is harmless. Line quantities are capped at
//! [`MAX_LINE_QUANTITY`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{OrderItem, Product};

/// Largest quantity a single cart line can hold.
pub const MAX_LINE_QUANTITY: i64 = 1_000;

/// An item in the shopping cart.
///
/// The price is frozen when the line is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    /// Always ≥ 1 while the line is in a cart.
    pub quantity: i64,
    pub unit: String,
    pub price: Money,
    pub image_ref: String,
}

impl CartItem {
    /// Builds a cart line for a catalog product with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            quantity: 1,
            unit: product.unit.clone(),
            price: product.price,
            image_ref: product.image_ref.clone(),
        }
    }

    /// Price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    fn to_order_item(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            price: self.price,
        }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product bumps quantity)
/// - Every line has quantity ≥ 1
/// - Lines keep the order in which they were first added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `item`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by exactly 1, up to
    ///   [`MAX_LINE_QUANTITY`]
    /// - Product not in cart: inserted with quantity 1
    ///
    /// The incoming `quantity` is ignored either way.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = (existing.quantity + 1).min(MAX_LINE_QUANTITY);
            return;
        }

        self.items.push(CartItem { quantity: 1, ..item });
    }

    /// Adds one unit of a catalog product.
    pub fn add_product(&mut self, product: &Product) {
        self.add_item(CartItem::from_product(product));
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - quantity ≤ 0: removes the line
    /// - quantity above [`MAX_LINE_QUANTITY`]: set to the cap
    /// - product not in cart: no-op
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.min(MAX_LINE_QUANTITY);
        }
    }

    /// Removes a line by product id. No-op when absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Takes the quantities of a placed order out of the cart.
    ///
    /// Lines added or bumped after the order was snapshotted keep the
    /// difference; lines that drop to zero are removed.
    pub fn remove_ordered(&mut self, ordered: &[OrderItem]) {
        for line in ordered {
            if let Some(item) = self.items.iter_mut().find(|i| i.product_id == line.product_id) {
                item.quantity -= line.quantity;
            }
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// Σ price × quantity over all lines, saturating. For display.
    pub fn total_cost(&self) -> Money {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Money::zero(), Money::saturating_add)
    }

    /// Σ price × quantity, or `None` if it does not fit in [`Money`].
    pub fn checked_total_cost(&self) -> Option<Money> {
        self.items.iter().try_fold(Money::zero(), |total, item| {
            total.checked_add(item.price.checked_multiply_quantity(item.quantity)?)
        })
    }

    /// Σ quantity over all lines (the cart badge number).
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |count, i| count.saturating_add(i.quantity))
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Snapshot of the cart as order lines.
    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.items.iter().map(CartItem::to_order_item).collect()
    }
}

/// Cart totals summary for view models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total_cost: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            total_cost: cart.total_cost(),
        }
    }
}
