//! # Domain Types
//!
//! Records shared by every dashboard.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Vendor       │   │     Order       │   │  WastePickup    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  uid            │◄──│  vendor_id      │   │  pickup_id      │       │
//! │  │  phone          │   │  order_id       │   │  vendor_id ─────┼──►    │
//! │  │  saathi credit  │   │  items          │   │  driver_id      │       │
//! │  │  waste credits  │   │  status         │   │  weight         │       │
//! │  └─────────────────┘   │  driver_id?     │   │  credits_earned │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  OrderStatus    │   │     Role        │       │
//! │  │  (catalog)      │   │  Pending        │   │  Vendor         │       │
//! │  │                 │   │  Confirmed      │   │  Manager        │       │
//! │  │                 │   │  Assigned       │   │  Driver         │       │
//! │  │                 │   │  Delivered      │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Behaviour lives next to the concern it belongs to: order transitions in
//! [`crate::lifecycle`], pickup creation in [`crate::waste`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::waste::WasteWeight;

// =============================================================================
// Role
// =============================================================================

/// Which dashboard a login lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vendor,
    Manager,
    Driver,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Vendor => write!(f, "vendor"),
            Role::Manager => write!(f, "manager"),
            Role::Driver => write!(f, "driver"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A purchasable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub price: Money,
    /// Selling unit ("kg", "bundle", ...).
    pub unit: String,
    pub image_ref: String,
    pub category: String,
}

// =============================================================================
// Vendor
// =============================================================================

/// A street vendor with two credit balances.
///
/// Balances change only when an order is placed (debit) or a waste pickup is
/// logged (waste credit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub uid: String,
    pub name: String,
    pub phone: String,
    pub stall_name: String,
    pub saathi_credit_limit: Money,
    pub saathi_credit_balance: Money,
    pub waste_credits_balance: Money,
}

// =============================================================================
// MFC User
// =============================================================================

/// Staff account at the Micro Fulfillment Center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MfcUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its lifecycle.
///
/// ```text
/// pending ──► confirmed ──► assigned ──► delivered
///   (vendor)   (manager)    (manager)     (driver, terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Assigned,
    Delivered,
}

impl OrderStatus {
    /// The only status this one may move to, or `None` when terminal.
    pub const fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Assigned),
            OrderStatus::Assigned => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    /// Checks whether `self → target` is a legal transition.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.successor() == Some(target)
    }

    /// Open orders count towards procurement.
    pub const fn is_open(self) -> bool {
        !matches!(self, OrderStatus::Delivered)
    }

    /// Confirmed or assigned: accepted by the MFC but not yet delivered.
    pub const fn is_in_progress(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Assigned)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Assigned => write!(f, "assigned"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order, frozen from the cart when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub price: Money,
}

impl OrderItem {
    /// Line total (price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A vendor's order as held by the backend-of-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Business identifier, e.g. `ORD-001`.
    pub order_id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    /// Σ price × quantity, fixed at creation.
    pub total_cost: Money,
    pub waste_credits_used: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub driver_id: Option<String>,
}

impl Order {
    /// Portion of the total paid from Saathi credit.
    pub fn saathi_credit_used(&self) -> Money {
        self.total_cost - self.waste_credits_used
    }
}

// =============================================================================
// Waste Pickup
// =============================================================================

/// An append-only ledger entry for collected organic waste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WastePickup {
    /// UUID v4.
    pub pickup_id: String,
    pub vendor_id: String,
    pub driver_id: String,
    pub weight: WasteWeight,
    pub credits_earned: Money,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}
