//! Swap Math
//!
//! Token deltas between two square-root prices and the single-step swap
//! computation, matching the rounding of the on-chain program: amounts the
//! trader pays round up, amounts the trader receives round down.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use router_core::ceil_div;

use crate::constants::fees::FEE_RATE_DENOMINATOR;

/// Outcome of swapping within one price segment of constant liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next: u128,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
}

fn q64() -> BigUint {
    BigUint::from(1u8) << 64
}

fn ordered(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Token A needed to move between two prices: L * (√b - √a) / (√a * √b)
pub fn get_delta_amount_a(sqrt_a: u128, sqrt_b: u128, liquidity: u128, round_up: bool) -> BigUint {
    let (lower, upper) = ordered(sqrt_a, sqrt_b);
    if lower == 0 {
        return BigUint::zero();
    }
    let numerator = (BigUint::from(liquidity) << 64) * (upper - lower);
    let upper = BigUint::from(upper);
    let lower = BigUint::from(lower);
    if round_up {
        ceil_div(&ceil_div(&numerator, &upper), &lower)
    } else {
        numerator / upper / lower
    }
}

/// Token B needed to move between two prices: L * (√b - √a)
pub fn get_delta_amount_b(sqrt_a: u128, sqrt_b: u128, liquidity: u128, round_up: bool) -> BigUint {
    let (lower, upper) = ordered(sqrt_a, sqrt_b);
    let product = BigUint::from(liquidity) * (upper - lower);
    if round_up {
        ceil_div(&product, &q64())
    } else {
        product >> 64
    }
}

/// Price reached after adding `amount_in` of the input token.
///
/// Adding token A lowers the price (rounded up), adding token B raises it
/// (rounded down). `None` when the result leaves the u128 range.
pub fn get_next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u64,
    a_to_b: bool,
) -> Option<u128> {
    if amount_in == 0 {
        return Some(sqrt_price);
    }
    if liquidity == 0 {
        return None;
    }
    let price = BigUint::from(sqrt_price);
    let liquidity_shifted = BigUint::from(liquidity) << 64;
    let next = if a_to_b {
        let denominator = &liquidity_shifted + BigUint::from(amount_in) * &price;
        ceil_div(&(liquidity_shifted * price), &denominator)
    } else {
        price + (BigUint::from(amount_in) << 64) / BigUint::from(liquidity)
    };
    next.to_u128()
}

/// Swap as much of `amount_remaining` as fits between the current and
/// target prices. The fee is charged on top of the amount that moves the
/// price.
pub fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate: u32,
) -> Option<SwapStep> {
    let a_to_b = sqrt_price_current >= sqrt_price_target;
    let fee_complement = u64::from(FEE_RATE_DENOMINATOR.checked_sub(fee_rate)?);
    let remaining_less_fee = (u128::from(amount_remaining) * u128::from(fee_complement)
        / u128::from(FEE_RATE_DENOMINATOR)) as u64;

    let amount_to_target = if a_to_b {
        get_delta_amount_a(sqrt_price_target, sqrt_price_current, liquidity, true)
    } else {
        get_delta_amount_b(sqrt_price_current, sqrt_price_target, liquidity, true)
    };

    let sqrt_price_next = if BigUint::from(remaining_less_fee) >= amount_to_target {
        sqrt_price_target
    } else {
        get_next_sqrt_price_from_input(sqrt_price_current, liquidity, remaining_less_fee, a_to_b)?
    };
    let reached_target = sqrt_price_next == sqrt_price_target;

    let (amount_in, amount_out) = if a_to_b {
        let amount_in = if reached_target {
            amount_to_target
        } else {
            get_delta_amount_a(sqrt_price_next, sqrt_price_current, liquidity, true)
        };
        let amount_out = get_delta_amount_b(sqrt_price_next, sqrt_price_current, liquidity, false);
        (amount_in, amount_out)
    } else {
        let amount_in = if reached_target {
            amount_to_target
        } else {
            get_delta_amount_b(sqrt_price_current, sqrt_price_next, liquidity, true)
        };
        let amount_out = get_delta_amount_a(sqrt_price_current, sqrt_price_next, liquidity, false);
        (amount_in, amount_out)
    };
    let amount_in = amount_in.to_u64()?;
    let amount_out = amount_out.to_u64()?;

    let fee_amount = if reached_target {
        ceil_div(
            &(BigUint::from(amount_in) * fee_rate),
            &BigUint::from(fee_complement),
        )
        .to_u64()?
    } else {
        amount_remaining.checked_sub(amount_in)?
    };

    Some(SwapStep {
        sqrt_price_next,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_price_at_tick;

    const Q64: u128 = 1 << 64;

    #[test]
    fn test_delta_amounts_at_unit_price() {
        let upper = get_sqrt_price_at_tick(100).unwrap();
        let liquidity = 1_000_000_000u128;
        let a_down = get_delta_amount_a(Q64, upper, liquidity, false);
        let a_up = get_delta_amount_a(Q64, upper, liquidity, true);
        let b_down = get_delta_amount_b(Q64, upper, liquidity, false);
        let b_up = get_delta_amount_b(Q64, upper, liquidity, true);
        // rounding direction differs by at most one unit
        assert!(a_up >= a_down && &a_up - &a_down <= BigUint::from(1u8));
        assert!(b_up >= b_down && &b_up - &b_down <= BigUint::from(1u8));
        // near price 1 the two sides are close, B slightly larger above 1
        assert!(b_down > a_down);
        assert_eq!(get_delta_amount_b(upper, Q64, liquidity, false), b_down);
    }

    #[test]
    fn test_next_price_moves_in_trade_direction() {
        let liquidity = 10u128.pow(12);
        let down = get_next_sqrt_price_from_input(Q64, liquidity, 1_000_000, true).unwrap();
        let up = get_next_sqrt_price_from_input(Q64, liquidity, 1_000_000, false).unwrap();
        assert!(down < Q64);
        assert!(up > Q64);
        assert_eq!(get_next_sqrt_price_from_input(Q64, liquidity, 0, true), Some(Q64));
        assert_eq!(get_next_sqrt_price_from_input(Q64, 0, 5, true), None);
    }

    #[test]
    fn test_step_stops_inside_segment() {
        let target = get_sqrt_price_at_tick(-1_000).unwrap();
        let step = compute_swap_step(Q64, target, 10u128.pow(12), 1_000_000, 2_500).unwrap();
        assert!(step.sqrt_price_next < Q64 && step.sqrt_price_next > target);
        // whole input consumed: the leftover after the price move is all fee
        assert_eq!(step.amount_in + step.fee_amount, 1_000_000);
        assert!(step.fee_amount >= 2_500);
        assert!(step.amount_out < step.amount_in);
    }

    #[test]
    fn test_step_reaches_target() {
        let target = get_sqrt_price_at_tick(10).unwrap();
        let liquidity = 1_000_000u128;
        let step = compute_swap_step(Q64, target, liquidity, u64::MAX / 2, 3_000).unwrap();
        assert_eq!(step.sqrt_price_next, target);
        let needed = get_delta_amount_b(Q64, target, liquidity, true).to_u64().unwrap();
        assert_eq!(step.amount_in, needed);
        // fee = ceil(amount_in * 3_000 / 997_000)
        let expected_fee = (u128::from(needed) * 3_000).div_ceil(997_000) as u64;
        assert_eq!(step.fee_amount, expected_fee);
    }

    #[test]
    fn test_step_without_liquidity_is_free() {
        let target = get_sqrt_price_at_tick(-60).unwrap();
        let step = compute_swap_step(Q64, target, 0, 500, 2_500).unwrap();
        assert_eq!(step.sqrt_price_next, target);
        assert_eq!((step.amount_in, step.amount_out, step.fee_amount), (0, 0, 0));
    }
}
