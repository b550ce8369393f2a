//! Lazy, infinite production of the Leibniz series denominators.
//!
//! The cursor yields `-3, 5, -7, 9, …`: odd magnitudes starting at
//! [`FIRST_DENOMINATOR`], advancing by [`STRIDE`], with the sign alternating
//! every step. The leading `+1` term is not produced here; it seeds the
//! accumulator instead.

use num_bigint::{BigInt, BigUint, Sign};

/// Magnitude of the first denominator handed to a worker.
pub const FIRST_DENOMINATOR: u32 = 3;

/// Distance between consecutive denominator magnitudes.
pub const STRIDE: u32 = 2;

/// Denominator cursor for the Leibniz series.
///
/// The cursor is owned by a single task and is only restartable by building
/// a new one. It never terminates on its own: stopping production is the
/// caller's decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Denominators {
    magnitude: BigUint,
    negative: bool,
}

impl Denominators {
    /// Creates a cursor positioned at `-3`.
    pub fn new() -> Self {
        Self {
            magnitude: BigUint::from(FIRST_DENOMINATOR),
            negative: true,
        }
    }

    /// Returns the next signed denominator without advancing.
    pub fn peek(&self) -> BigInt {
        BigInt::from_biguint(self.sign(), self.magnitude.clone())
    }

    /// Emits the next two denominators as one unit of work.
    ///
    /// The trailing denominator is the lead with its sign flipped and its
    /// magnitude advanced by [`STRIDE`].
    pub fn next_pair(&mut self) -> DenominatorPair {
        let lead = self.advance();
        let trail = self.advance();
        DenominatorPair { lead, trail }
    }

    /// Emits `width` consecutive pairs, one per worker.
    pub fn next_batch(&mut self, width: usize) -> Vec<DenominatorPair> {
        (0..width).map(|_| self.next_pair()).collect()
    }

    fn advance(&mut self) -> BigInt {
        let denominator = self.peek();
        self.magnitude += STRIDE;
        self.negative = !self.negative;
        denominator
    }

    const fn sign(&self) -> Sign {
        if self.negative { Sign::Minus } else { Sign::Plus }
    }
}

impl Default for Denominators {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Denominators {
    type Item = BigInt;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Two adjacent denominators evaluated together by one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenominatorPair {
    pub lead: BigInt,
    pub trail: BigInt,
}

impl DenominatorPair {
    /// Number of series terms a pair contributes.
    pub const TERMS: u32 = 2;

    pub fn iter(&self) -> impl Iterator<Item = &BigInt> {
        [&self.lead, &self.trail].into_iter()
    }
}
