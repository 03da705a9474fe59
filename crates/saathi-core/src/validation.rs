//! # Validation Module
//!
//! Input validation for everything a dashboard form can submit.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form                                                │
//! │  └── Immediate feedback (empty fields, disabled buttons)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: saathi-app command                                           │
//! │  └── THIS MODULE: phone, OTP, credentials, waste weight, driver id     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain operation                                             │
//! │  └── Re-checks its own invariants (e.g. WastePickup::record)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed validation aborts the operation before any state changes.

use crate::error::ValidationError;
use crate::waste::{WasteWeight, MAX_PICKUP_WEIGHT};

const PHONE_DIGITS: usize = 10;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates and normalizes an Indian mobile number.
///
/// ## Rules
/// - Spaces and dashes are ignored
/// - Optional `+91` / `91` country prefix
/// - Exactly 10 digits, starting with 6-9
///
/// ## Returns
/// The bare 10-digit number.
///
/// ```rust
/// use saathi_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("+91 98765 43210").unwrap(), "9876543210");
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let digits = match digits.strip_prefix("91") {
        Some(rest) if rest.len() == 10 => rest,
        _ => digits,
    };

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a 10-digit mobile number".to_string(),
        });
    }
    check_length("phone", digits, PHONE_DIGITS, PHONE_DIGITS)?;

    if !digits.starts_with(['6', '7', '8', '9']) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must start with 6, 7, 8 or 9".to_string(),
        });
    }

    Ok(digits.to_string())
}

/// Validates a one-time password.
///
/// ## Rules
/// - Exactly `length` characters
/// - ASCII digits only
///
/// ```rust
/// use saathi_core::validation::validate_otp;
///
/// assert!(validate_otp("123456", 6).is_ok());
/// assert!(validate_otp("12345", 6).is_err());
/// ```
pub fn validate_otp(otp: &str, length: usize) -> ValidationResult<()> {
    let otp = otp.trim();

    if otp.is_empty() {
        return Err(ValidationError::Required {
            field: "otp".to_string(),
        });
    }

    if !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: format!("must be exactly {} digits", length),
        });
    }

    check_length("otp", otp, length, length)
}

/// Digit-string length check shared by phone and OTP.
fn check_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates MFC email/password credentials.
///
/// Only presence is checked; the MFC login is simulated.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a driver id before assignment.
pub fn validate_driver_id(driver_id: &str) -> ValidationResult<()> {
    if driver_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "driver_id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a waste weight.
///
/// ## Rules
/// - Must be strictly positive
/// - At most [`MAX_PICKUP_WEIGHT`] per pickup
///
/// ## Driver Workflow
/// ```text
/// Driver types weight ──► validate_waste_weight ──┬── ≤ 0 → "Invalid Weight"
///                                                 └── OK  → credits issued
/// ```
pub fn validate_waste_weight(weight: WasteWeight) -> ValidationResult<()> {
    if weight.grams() <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "weight_kg".to_string(),
        });
    }

    if weight > MAX_PICKUP_WEIGHT {
        return Err(ValidationError::TooLarge {
            field: "weight_kg".to_string(),
            max: MAX_PICKUP_WEIGHT.to_string(),
        });
    }

    Ok(())
}
