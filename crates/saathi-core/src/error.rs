//! # Error Types
//!
//! Domain-specific error types for saathi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  saathi-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  saathi-app errors                                                     │
//! │  ├── BackendError     - Backend actor failures                         │
//! │  └── ApiError         - What the dashboard sees (code + message)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BackendError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations never fail: unknown product ids are no-ops. Lifecycle
//! operations on unknown orders are explicit [`CoreError::OrderNotFound`]s.

use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An order status change that is not the immediate forward step.
    ///
    /// ## When This Occurs
    /// ```text
    /// pending ──► assigned          (skips confirmed)
    /// delivered ──► anything        (terminal)
    /// confirmed ──► pending         (backwards)
    /// ```
    /// The order is left untouched.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Order id is not known to the backend-of-record.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Vendor id (or phone) is not known to the backend-of-record.
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    /// Tried to place an order from an empty cart.
    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    /// The part of the order not covered by waste credits exceeds the
    /// vendor's Saathi credit balance.
    #[error("Insufficient Saathi credit: available {available}, required {required}")]
    InsufficientCredit { available: Money, required: Money },

    /// A driver tried to deliver an order assigned to someone else.
    #[error("Order {order_id} is not assigned to driver {driver_id}")]
    NotAssignedDriver { order_id: String, driver_id: String },

    /// MFC login with an account that maps to no role.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A money amount left the representable range.
    #[error("Amount out of range")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched, so a failed validation never leaves a
/// partial change behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value exceeds an upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-numeric OTP, malformed weight).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
