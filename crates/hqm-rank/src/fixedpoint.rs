//! Fixed-point money type.
//!
//! Budgets and prices use a 1e-6 (micros) fixed-point representation stored
//! as `i64`, so position sizing is exact integer arithmetic: floor division
//! never rounds up and never overspends.
//!
//! 1 USD = 1_000_000 Micros. Share counts stay plain `u64` and are never
//! implicitly convertible.

use serde::{Deserialize, Serialize};

/// Fixed-point scale: micros per unit of currency.
pub const MICROS_SCALE: i64 = 1_000_000;

/// A fixed-point monetary amount at 1e-6 scale.
///
/// There is intentionally no `From<i64>`; construct with [`Micros::new`] or
/// [`Micros::from_decimal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Micros(i64);

impl Micros {
    pub const ZERO: Micros = Micros(0);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Micros(raw)
    }

    /// Convert a decimal amount, rounding to the nearest micro.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_decimal(value: f64) -> Option<Micros> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * MICROS_SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(Micros(scaled as i64))
    }

    /// Convert a decimal price, rounding up to the next micro.
    ///
    /// The result is never below `value`, so units sized against it never
    /// cost more than the budget at the exact price. Products that land within
    /// a few ULPs of a whole micro are binary noise of a decimal input
    /// (`0.07 * 1e6 = 70000.00000000001`) and snap to it.
    pub fn from_decimal_ceil(value: f64) -> Option<Micros> {
        if !value.is_finite() {
            return None;
        }
        let scaled = value * MICROS_SCALE as f64;
        let nearest = scaled.round();
        let ceiled = if (scaled - nearest).abs() <= scaled.abs() * f64::EPSILON * 4.0 {
            nearest
        } else {
            scaled.ceil()
        };
        if ceiled < i64::MIN as f64 || ceiled >= i64::MAX as f64 {
            return None;
        }
        Some(Micros(ceiled as i64))
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Split evenly into `parts`, rounding down. `None` when `parts` is 0.
    #[inline]
    pub fn split_floor(self, parts: usize) -> Option<Micros> {
        let parts = i64::try_from(parts).ok()?;
        self.0.checked_div(parts).map(Micros)
    }

    /// Whole units of `unit_price` affordable with this amount (floor).
    ///
    /// `None` when `unit_price` is not positive or this amount is negative.
    pub fn units_affordable(self, unit_price: Micros) -> Option<u64> {
        if unit_price.0 <= 0 || self.0 < 0 {
            return None;
        }
        u64::try_from(self.0 / unit_price.0).ok()
    }

    /// Multiply a per-unit price by a share count. `None` on overflow.
    #[inline]
    pub fn checked_mul_qty(self, qty: u64) -> Option<Micros> {
        let qty = i64::try_from(qty).ok()?;
        self.0.checked_mul(qty).map(Micros)
    }

    #[inline]
    pub fn checked_add(self, rhs: Micros) -> Option<Micros> {
        self.0.checked_add(rhs.0).map(Micros)
    }
}

impl std::fmt::Display for Micros {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units = self.0 / MICROS_SCALE;
        let frac = (self.0 % MICROS_SCALE).abs();
        if self.0 < 0 && units == 0 {
            write!(f, "-{units}.{frac:06}")
        } else {
            write!(f, "{units}.{frac:06}")
        }
    }
}
