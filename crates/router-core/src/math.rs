//! Exact integer and rational helpers shared by the simulators and the router.
//!
//! Nothing here uses floating point except the display conversions.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis-point denominator (100% = 10_000)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Parts-per-million denominator used for price impact
pub const PPM_DENOMINATOR: u64 = 1_000_000;

/// Exact price as a ratio of output units per input unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    numerator: BigUint,
    denominator: BigUint,
}

impl Price {
    pub fn new(numerator: impl Into<BigUint>, denominator: impl Into<BigUint>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero() || self.denominator.is_zero()
    }

    /// Price of a path: this hop followed by `next`
    pub fn then(&self, next: &Price) -> Price {
        Price {
            numerator: &self.numerator * &next.numerator,
            denominator: &self.denominator * &next.denominator,
        }
    }

    /// Convert an amount of the output token back into input-token units (floored)
    pub fn to_input_units(&self, amount_out: u64) -> Option<u64> {
        if self.numerator.is_zero() {
            return None;
        }
        (BigUint::from(amount_out) * &self.denominator / &self.numerator).to_u64()
    }

    /// Display-only approximation
    pub fn as_f64(&self) -> f64 {
        let num = self.numerator.to_f64().unwrap_or(f64::INFINITY);
        let den = self.denominator.to_f64().unwrap_or(f64::INFINITY);
        if den == 0.0 {
            return 0.0;
        }
        num / den
    }
}

/// Price impact in parts per million
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceImpact(pub u64);

impl PriceImpact {
    pub const ZERO: PriceImpact = PriceImpact(0);

    /// |execution / reference - 1| for `amount_in` swapped into `amount_out`
    /// against the pre-trade `reference` price, floored to whole ppm.
    pub fn from_execution(amount_in: u64, amount_out: u64, reference: &Price) -> Self {
        if amount_in == 0 || reference.is_zero() {
            return Self::ZERO;
        }
        let expected = BigUint::from(amount_in) * reference.numerator();
        let actual = BigUint::from(amount_out) * reference.denominator();
        let diff = if actual > expected {
            actual - &expected
        } else {
            &expected - actual
        };
        let ppm = diff * PPM_DENOMINATOR / expected;
        Self(ppm.to_u64().unwrap_or(u64::MAX))
    }

    pub fn ppm(&self) -> u64 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

impl fmt::Display for PriceImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}%", self.as_percent())
    }
}

/// Minimum acceptable output: floor(amount * (10_000 - slippage_bps) / 10_000)
pub fn apply_slippage(amount: u64, slippage_bps: u16) -> u64 {
    let bps = u64::from(slippage_bps).min(BPS_DENOMINATOR);
    let scaled = u128::from(amount) * u128::from(BPS_DENOMINATOR - bps) / u128::from(BPS_DENOMINATOR);
    // scaled <= amount
    scaled as u64
}

/// Split an amount into (fee, remainder) with the fee floored
pub fn split_fee(amount: u64, fee_bps: u16) -> (u64, u64) {
    let bps = u64::from(fee_bps).min(BPS_DENOMINATOR);
    let fee = (u128::from(amount) * u128::from(bps) / u128::from(BPS_DENOMINATOR)) as u64;
    (fee, amount - fee)
}

/// ceil(numerator / denominator); zero when the denominator is zero
pub fn ceil_div(numerator: &BigUint, denominator: &BigUint) -> BigUint {
    if denominator.is_zero() {
        return BigUint::zero();
    }
    (numerator + denominator - 1u32) / denominator
}
