//! # saathi-core: Pure Business Logic for Saathi Circle
//!
//! Everything a vendor, the MFC manager and a delivery driver can do to the
//! marketplace, expressed as pure functions over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Saathi Circle Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Dashboards (Vendor / Manager / Driver)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands + view models                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     saathi-app: sessions, BackendHandle, notifications          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ saathi-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   cart   lifecycle   waste   procurement   catalog   money      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Vendor, Order, WastePickup, ...)
//! - [`money`] - Money in integer paise
//! - [`cart`] - The vendor's shopping cart
//! - [`lifecycle`] - Order state transitions and payment split
//! - [`waste`] - Waste weight and credit computation
//! - [`procurement`] - Aggregate procurement list
//! - [`catalog`] - Static product catalog
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use saathi_core::cart::Cart;
//! use saathi_core::catalog::Catalog;
//!
//! let catalog = Catalog::demo();
//! let mut cart = Cart::new();
//! for product in catalog.products() {
//!     cart.add_product(product);
//! }
//!
//! assert_eq!(cart.item_count(), 4);
//! assert_eq!(cart.total_cost().paise(), 8_800); // ₹25 + ₹18 + ₹30 + ₹15
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod procurement;
pub mod types;
pub mod validation;
pub mod waste;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, MAX_LINE_QUANTITY};
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use procurement::ProcurementLine;
pub use types::*;
pub use waste::{WasteWeight, MAX_PICKUP_WEIGHT};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Waste credit paid out per kilogram of organic waste (₹5/kg).
pub const WASTE_CREDIT_RATE_PER_KG: Money = Money::from_paise(500);

/// Length of the one-time password accepted by the vendor login.
pub const OTP_LENGTH: usize = 6;
