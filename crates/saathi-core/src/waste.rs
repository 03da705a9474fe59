//! # Waste Credits
//!
//! Turns collected organic waste into vendor credit.
//!
//! ## Pickup Flow
//! ```text
//! Driver enters weight "3.5"
//!      │
//!      ▼
//! WasteWeight::parse_kg ──► 3500 g   (ValidationError if ≤ 0, over 1000 kg or not a number)
//!      │
//!      ▼
//! credits_for(3500 g, ₹5/kg) ──► ₹17.50
//!      │
//!      ▼
//! log_pickup ──► WastePickup (append-only) + vendor.waste_credits_balance += ₹17.50
//! ```
//!
//! Weights are kept in whole grams so credits stay in integer paise.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Vendor, WastePickup};
use crate::validation::{validate_waste_weight, ValidationResult};

const GRAMS_PER_KG: i64 = 1000;

/// Heaviest single pickup a driver can log (1000 kg).
pub const MAX_PICKUP_WEIGHT: WasteWeight = WasteWeight::from_grams(1_000 * GRAMS_PER_KG);

// =============================================================================
// Waste Weight
// =============================================================================

/// A weight of collected waste in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WasteWeight(i64);

impl WasteWeight {
    /// Creates a weight from grams. Not validated; see [`validate_waste_weight`].
    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        WasteWeight(grams)
    }

    /// Creates a weight from kilograms, rounded to the nearest gram.
    ///
    /// ```rust
    /// use saathi_core::waste::WasteWeight;
    ///
    /// assert_eq!(WasteWeight::from_kg(3.5).unwrap().grams(), 3500);
    /// assert!(WasteWeight::from_kg(0.0).is_err());
    /// assert!(WasteWeight::from_kg(-2.0).is_err());
    /// assert!(WasteWeight::from_kg(1e300).is_err());
    /// ```
    pub fn from_kg(kg: f64) -> ValidationResult<Self> {
        if !kg.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "weight_kg".to_string(),
                reason: "must be a number".to_string(),
            });
        }
        let grams = (kg * GRAMS_PER_KG as f64).round();
        if grams > MAX_PICKUP_WEIGHT.grams() as f64 {
            return Err(ValidationError::TooLarge {
                field: "weight_kg".to_string(),
                max: MAX_PICKUP_WEIGHT.to_string(),
            });
        }
        let weight = WasteWeight(grams as i64);
        validate_waste_weight(weight)?;
        Ok(weight)
    }

    /// Parses the driver's form input (kilograms, decimal allowed).
    pub fn parse_kg(input: &str) -> ValidationResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Required {
                field: "weight_kg".to_string(),
            });
        }

        let kg: f64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "weight_kg".to_string(),
            reason: format!("'{}' is not a number", input),
        })?;

        Self::from_kg(kg)
    }

    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    /// Kilograms, for display only.
    #[inline]
    pub fn kg(&self) -> f64 {
        self.0 as f64 / GRAMS_PER_KG as f64
    }
}

/// Shows `3.5 kg`, `12 kg`, `0.25 kg`.
impl fmt::Display for WasteWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / GRAMS_PER_KG;
        let frac = (self.0 % GRAMS_PER_KG).abs();
        if frac == 0 {
            return write!(f, "{} kg", whole);
        }
        let digits = format!("{:03}", frac);
        write!(f, "{}.{} kg", whole, digits.trim_end_matches('0'))
    }
}

// =============================================================================
// Credit Computation
// =============================================================================

/// Credits earned for `weight` at `rate_per_kg`, rounded half-up to the paisa.
///
/// ```rust
/// use saathi_core::money::Money;
/// use saathi_core::waste::{credits_for, WasteWeight};
///
/// let credits = credits_for(WasteWeight::from_grams(3500), Money::from_rupees(5));
/// assert_eq!(credits, Money::from_paise(1750));
/// ```
pub fn credits_for(weight: WasteWeight, rate_per_kg: Money) -> Money {
    let paise = (weight.grams() as i128 * rate_per_kg.paise() as i128 + 500) / 1000;
    Money::from_paise(i64::try_from(paise).unwrap_or(i64::MAX))
}

impl WastePickup {
    /// Creates a pickup ledger entry.
    ///
    /// Fails with a validation error when the weight is not positive.
    pub fn record(
        vendor_id: &str,
        driver_id: &str,
        weight: WasteWeight,
        rate_per_kg: Money,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_waste_weight(weight)?;

        Ok(WastePickup {
            pickup_id: Uuid::new_v4().to_string(),
            vendor_id: vendor_id.to_string(),
            driver_id: driver_id.to_string(),
            weight,
            credits_earned: credits_for(weight, rate_per_kg),
            timestamp,
        })
    }
}

impl Vendor {
    /// Adds earned waste credits to the vendor's balance.
    ///
    /// A balance that would leave the [`Money`] range is `AmountOverflow`
    /// and stays as it was.
    pub fn credit_waste(&mut self, credits: Money) -> CoreResult<()> {
        self.waste_credits_balance = self
            .waste_credits_balance
            .checked_add(credits)
            .ok_or(CoreError::AmountOverflow)?;
        Ok(())
    }
}

/// Records a pickup for `vendor` and credits the vendor in one step.
///
/// On error neither the ledger nor the vendor balance changes.
pub fn log_pickup(
    vendor: &mut Vendor,
    driver_id: &str,
    weight: WasteWeight,
    rate_per_kg: Money,
    timestamp: DateTime<Utc>,
) -> CoreResult<WastePickup> {
    let pickup = WastePickup::record(&vendor.uid, driver_id, weight, rate_per_kg, timestamp)?;
    vendor.credit_waste(pickup.credits_earned)?;
    Ok(pickup)
}
