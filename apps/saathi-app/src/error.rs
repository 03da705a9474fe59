//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command Function  ──►  Result<T, ApiError>                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation?      ─── ValidationError ──────────────┐                  │
//! │  Lifecycle?       ─── CoreError::InvalidTransition ─┼──► ApiError      │
//! │  Backend gone?    ─── BackendError::ChannelClosed ──┘      │           │
//! │                                                            ▼           │
//! │                                          destructive notification      │
//! │                                          { title, message }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A frontend receives:
//! ```json
//! { "code": "INVALID_TRANSITION", "message": "Order ORD-001 cannot move from pending to assigned" }
//! ```

use saathi_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

/// Error returned from dashboard commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order, vendor or product unknown
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Order status change out of sequence
    InvalidTransition,

    /// Saathi credit balance too low
    InsufficientCredit,

    /// Login rejected or wrong session for the command
    Unauthorized,

    /// Cart operation failed
    CartError,

    /// Backend unavailable
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            CoreError::VendorNotFound(id) => ApiError::not_found("Vendor", &id),
            e @ CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, e.to_string())
            }
            e @ CoreError::InsufficientCredit { .. } => {
                ApiError::new(ErrorCode::InsufficientCredit, e.to_string())
            }
            e @ CoreError::EmptyCart => ApiError::cart(e.to_string()),
            e @ (CoreError::NotAssignedDriver { .. } | CoreError::InvalidCredentials) => {
                ApiError::unauthorized(e.to_string())
            }
            e @ CoreError::AmountOverflow => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Core(e) => e.into(),
            BackendError::ChannelClosed => {
                tracing::error!("Backend channel closed");
                ApiError::internal("Backend unavailable")
            }
        }
    }
}
