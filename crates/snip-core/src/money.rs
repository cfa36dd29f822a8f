//! # Money Module
//!
//! Provides the `Money` type for visit amounts and customer spend.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A customer's totalSpent is a running sum of every visit amount.        │
//! │  With floats, R 0.10 + R 0.20 drifts to 0.30000000000000004.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    totalSpent = Σ amount_cents, exact for any number of visits          │
//! │    points     = amount_cents / 1000 (1 point per R 10, floored)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use snip_core::money::Money;
//!
//! let haircut = Money::from_major(350);        // R 350.00
//! let total = haircut + Money::from_cents(50); // R 350.50
//! assert_eq!(total.cents(), 35_050);
//! assert_eq!(total.loyalty_points(), 35);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

/// Currency units that earn one loyalty point.
pub const CURRENCY_UNITS_PER_POINT: i64 = 10;

/// Cents per whole currency unit.
pub const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// NewVisit.amount ──► Visit.amount ──► Customer.total_spent
///        │                                     │
///        └──► calculate_points ──► Visit.points_earned ──► Customer.points
///                                               │
///                        Salon.total_revenue ◄──┘ (rollup)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use snip_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(200).cents(), 20_000);
    /// ```
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * CENTS_PER_UNIT)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Loyalty points earned for this amount: one per 10 whole units, floored.
    ///
    /// Negative amounts earn nothing.
    ///
    /// ```rust
    /// use snip_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(99).loyalty_points(), 9);
    /// assert_eq!(Money::from_cents(999).loyalty_points(), 0); // R 9.99
    /// ```
    #[inline]
    pub const fn loyalty_points(&self) -> i64 {
        if self.0 <= 0 {
            return 0;
        }
        self.0 / (CURRENCY_UNITS_PER_POINT * CENTS_PER_UNIT)
    }

    /// Addition that returns `None` instead of overflowing.
    ///
    /// ```rust
    /// use snip_core::money::Money;
    ///
    /// let one = Money::from_cents(1);
    /// assert_eq!(one.checked_add(one), Some(Money::from_cents(2)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_add(one), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition clamped to the `i64` range.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Integer average over `count` items, rounded half up.
    ///
    /// Returns zero for an empty set.
    pub fn average(total: Money, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        let count = count as i128;
        let total = total.0 as i128;
        Money(((total * 2 + count) / (count * 2)) as i64)
    }

    /// Formats with the given currency symbol, e.g. `R 350.00`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{} {}.{:02}", sign, symbol, self.major().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. Use `format_with` for the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with("R"))
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

/// Saturates at the `i64` bounds so rollups over stored data never panic.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_cents(35_099);
        assert_eq!(money.major(), 350);
        assert_eq!(money.cents_part(), 99);
        assert_eq!(Money::from_major(350).cents(), 35_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_major(350).to_string(), "R 350.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R 5.50");
        assert_eq!(Money::from_cents(7).format_with("KES"), "KES 0.07");
    }

    #[test]
    fn test_loyalty_points_floor() {
        for units in [0_i64, 1, 9, 10, 11, 99, 100, 350, 1234] {
            assert_eq!(Money::from_major(units).loyalty_points(), units / 10);
        }
        // Fractions of a unit never tip over a boundary early.
        assert_eq!(Money::from_cents(99_999).loyalty_points(), 99);
        assert_eq!(Money::from_cents(-5_000).loyalty_points(), 0);
    }

    #[test]
    fn test_sum_is_exact() {
        let amounts = [Money::from_cents(10), Money::from_cents(20), Money::from_cents(30)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 60);
    }

    #[test]
    fn test_checked_add_overflow() {
        let near_max = Money::from_cents(i64::MAX - 10);
        assert_eq!(near_max.checked_add(Money::from_cents(10)), Some(Money::from_cents(i64::MAX)));
        assert_eq!(near_max.checked_add(Money::from_cents(11)), None);
    }

    #[test]
    fn test_sum_saturates() {
        let amounts = [Money::from_cents(i64::MAX), Money::from_cents(1)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(Money::average(Money::from_cents(1000), 3).cents(), 333);
        assert_eq!(Money::average(Money::from_cents(1001), 2).cents(), 501);
        assert_eq!(Money::average(Money::from_cents(500), 0), Money::zero());
    }
}
