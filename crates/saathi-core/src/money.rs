//! # Money Module
//!
//! Provides the `Money` type used for prices, order totals and both credit
//! balances (Saathi credit and waste credit).
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  3.5 kg of waste × ₹5/kg                                                │
//! │                                                                         │
//! │  Floating point:  3.5 * 5 = 17.5, but 0.1 kg steps drift quickly       │
//! │                                                                         │
//! │  OUR SOLUTION: integer paise (₹1 = 100 paise)                           │
//! │    3500 g × 500 paise/kg / 1000 = 1750 paise = ₹17.50                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use saathi_core::money::Money;
//!
//! let onion = Money::from_rupees(25);
//! let line = onion.multiply_quantity(5);
//! assert_eq!(line.to_string(), "₹125.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest rupee unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: balances are debited, and a debit is a negative delta
/// - **Single field tuple struct**: zero-cost wrapper over i64
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► CartItem.price ──► Cart.total_cost ──► Order.total_cost
///                                                               │
///                      Vendor.saathi_credit_balance  ◄── debit ─┤
///                      Vendor.waste_credits_balance  ◄── debit ─┘
///
/// WastePickup.credits_earned ──► Vendor.waste_credits_balance (credit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use saathi_core::money::Money;
    ///
    /// let credits = Money::from_paise(1750); // ₹17.50
    /// assert_eq!(credits.paise(), 1750);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Catalog prices are whole rupees, so this is the common constructor.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    ///
    /// ```rust
    /// use saathi_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1750).rupees(), 17);
    /// assert_eq!(Money::from_paise(-550).rupees(), -5);
    /// ```
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` range.
    ///
    /// Use [`Money::checked_multiply_quantity`] for amounts that get stored.
    ///
    /// ```rust
    /// use saathi_core::money::Money;
    ///
    /// let tomatoes = Money::from_rupees(30);
    /// assert_eq!(tomatoes.multiply_quantity(3), Money::from_rupees(90));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity; `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    /// Adds two amounts; `None` on overflow.
    ///
    /// ```rust
    /// use saathi_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1).checked_add(Money::from_paise(i64::MAX)), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    /// Adds two amounts, saturating at the `i64` range.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub const fn non_negative(self) -> Money {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `₹17.50`. Dashboards may format differently for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1750);
        assert_eq!(money.paise(), 1750);
        assert_eq!(money.rupees(), 17);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(25).paise(), 2500);
        assert_eq!(Money::from_rupees(-3).paise(), -300);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1750).to_string(), "₹17.50");
        assert_eq!(Money::from_rupees(2500).to_string(), "₹2500.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);

        let mut balance = a;
        balance -= b;
        balance += Money::from_paise(25);
        assert_eq!(balance.paise(), 525);
    }

    #[test]
    fn test_sum() {
        let total: Money = [25, 18, 30]
            .into_iter()
            .map(Money::from_rupees)
            .sum();
        assert_eq!(total, Money::from_rupees(73));

        let empty: Money = std::iter::empty().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_min_and_non_negative() {
        let a = Money::from_rupees(180);
        let b = Money::from_rupees(215);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
        assert_eq!(Money::from_paise(-1).non_negative(), Money::zero());
        assert_eq!(a.non_negative(), a);
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        let huge = Money::from_paise(i64::MAX / 2);

        assert_eq!(huge.checked_multiply_quantity(3), None);
        assert_eq!(huge.checked_add(huge + Money::from_paise(2)), None);
        assert_eq!(huge.multiply_quantity(3), Money::from_paise(i64::MAX));
        assert_eq!(huge.saturating_add(huge).saturating_add(huge), Money::from_paise(i64::MAX));

        assert_eq!(
            Money::from_rupees(30).checked_multiply_quantity(4),
            Some(Money::from_rupees(120))
        );
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paise(1).is_positive());
        assert!(Money::from_paise(-1).is_negative());
    }
}
