//! Fixed-scale arbitrary-precision arithmetic for series terms.
//!
//! Every term is carried as a [`BigDecimal`] with the same number of
//! fractional digits (the *scale*). Folding terms is then exact integer
//! addition, so the running sum does not depend on the order in which
//! workers finish.

use crate::sequence::Denominators;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

/// Multiplier applied to the series sum: `π = 4 · (1 − 1/3 + 1/5 − …)`.
pub const MULTIPLIER: u32 = 4;

/// Scale-aware reciprocal and formatting helper shared by every worker.
///
/// Holds the precomputed unit `10^scale`. It is built once per service and
/// shared read-only, so no worker ever recomputes the power of ten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    scale: u32,
    unit: BigUint,
}

impl FixedPoint {
    /// Creates a helper carrying `scale` fractional decimal digits.
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            unit: BigUint::from(10_u8).pow(scale),
        }
    }

    /// Number of fractional digits carried by every term.
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns `round(10^scale / denominator)` as a signed integer, rounding
    /// half away from zero.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero. The sequence never produces one, so
    /// reaching this is a programming error.
    pub fn reciprocal(&self, denominator: &BigInt) -> BigInt {
        let magnitude = denominator.magnitude();
        assert!(!magnitude.is_zero(), "zero denominator in series term");

        let rounded = (&self.unit * 2_u32 + magnitude) / (magnitude * 2_u32);
        BigInt::from_biguint(denominator.sign(), rounded)
    }

    /// Wraps raw scaled digits as a decimal at this scale.
    pub fn to_decimal(&self, digits: BigInt) -> BigDecimal {
        BigDecimal::new(digits, i64::from(self.scale))
    }

    /// The first series term, `1`, at this scale.
    pub fn one(&self) -> BigDecimal {
        self.to_decimal(BigInt::from(self.unit.clone()))
    }

    /// Serially sums `1` plus the first `terms` reciprocal terms.
    ///
    /// This is the reference the concurrent pipeline must agree with once it
    /// has drained.
    pub fn prefix_sum(&self, terms: u64) -> BigDecimal {
        let digits = (0..terms)
            .zip(Denominators::new())
            .fold(BigInt::from(self.unit.clone()), |acc, (_, d)| {
                acc + self.reciprocal(&d)
            });
        self.to_decimal(digits)
    }
}

/// Formats `MULTIPLIER × sum` rounded to `digits` significant digits.
pub fn approximate(sum: &BigDecimal, digits: u64) -> String {
    (sum * &BigDecimal::from(MULTIPLIER))
        .with_prec(digits)
        .to_string()
}
