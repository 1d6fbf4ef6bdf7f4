//! AMM Calculator
//!
//! Swap math using the constant product formula (x * y = k), with the fee
//! deducted from the input before the invariant is applied.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use solana_sdk::pubkey::Pubkey;

use router_core::{ceil_div, Price, PriceImpact, SimulationError, SwapQuote, BPS_DENOMINATOR};

use crate::state::AmmPool;

/// Pool fee on an input amount, rounded up
pub fn calculate_fee(amount_in: u64, fee_bps: u16) -> u64 {
    let fee = ceil_div(
        &(BigUint::from(amount_in) * fee_bps),
        &BigUint::from(BPS_DENOMINATOR),
    );
    // fee <= amount_in whenever fee_bps <= 10_000
    fee.to_u64().unwrap_or(amount_in).min(amount_in)
}

/// Calculate swap output using constant product formula
///
/// Formula: output = reserves_out * net_in / (reserves_in + net_in)
/// where net_in = input_amount - ceil(input_amount * fee_bps / 10_000).
///
/// Returns (output, fee). Output is zero when either reserve is empty.
pub fn calculate_output(
    reserves_in: u64,
    reserves_out: u64,
    input_amount: u64,
    fee_bps: u16,
) -> (u64, u64) {
    let fee = calculate_fee(input_amount, fee_bps);
    if reserves_in == 0 || reserves_out == 0 {
        return (0, fee);
    }
    let net_in = BigUint::from(input_amount - fee);

    let numerator = BigUint::from(reserves_out) * &net_in;
    let denominator = BigUint::from(reserves_in) + net_in;

    // numerator / denominator < reserves_out, so it always fits
    let output = (numerator / denominator).to_u64().unwrap_or(0);
    (output, fee)
}

/// Spot price (reserves_out / reserves_in) as an exact ratio
pub fn spot_price(reserves_in: u64, reserves_out: u64) -> Price {
    Price::new(reserves_out, reserves_in)
}

/// Simulate an exact-input swap through a constant-product pool
pub fn simulate_swap(
    pool: &AmmPool,
    input_mint: &Pubkey,
    amount_in: u64,
    now: i64,
) -> Result<SwapQuote, SimulationError> {
    if !pool.is_active(now) {
        return Err(SimulationError::PoolInactive {
            pool: pool.id,
            open_time: pool.open_time,
            now,
        });
    }

    let reserves = pool.orient(input_mint)?;
    if reserves.reserve_in == 0 || reserves.reserve_out == 0 {
        return Err(SimulationError::InsufficientLiquidity { pool: pool.id });
    }

    let (amount_out, fee_amount) =
        calculate_output(reserves.reserve_in, reserves.reserve_out, amount_in, pool.fee_bps);
    if amount_out == 0 || amount_out >= reserves.reserve_out {
        return Err(SimulationError::InsufficientLiquidity { pool: pool.id });
    }

    let spot_price = spot_price(reserves.reserve_in, reserves.reserve_out);
    let price_impact = PriceImpact::from_execution(amount_in, amount_out, &spot_price);

    Ok(SwapQuote {
        amount_in,
        amount_out,
        fee_amount,
        price_impact,
        spot_price,
        tick_arrays: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_pool;

    #[test]
    fn test_calculate_output_exact() {
        // fee = ceil(10_000 * 25 / 10_000) = 25, net = 9_975
        // out = 4_000_000 * 9_975 / 1_009_975 = 39_505.92.. -> 39_505
        let (output, fee) = calculate_output(1_000_000, 4_000_000, 10_000, 25);
        assert_eq!(fee, 25);
        assert_eq!(output, 39_505);
    }

    #[test]
    fn test_fee_rounds_up() {
        assert_eq!(calculate_fee(1, 25), 1);
        assert_eq!(calculate_fee(399, 25), 1);
        assert_eq!(calculate_fee(401, 25), 2);
        assert_eq!(calculate_fee(10_000, 0), 0);
        assert_eq!(calculate_fee(u64::MAX, 10_000), u64::MAX);
    }

    #[test]
    fn test_output_strictly_decreases_with_fee() {
        let reserves = [(1_000_000u64, 4_000_000u64), (10u64.pow(12), 3 * 10u64.pow(9))];
        for (r_in, r_out) in reserves {
            let input = r_in / 50;
            let mut previous = u64::MAX;
            for fee_bps in [0u16, 1, 5, 25, 30, 100, 300, 1_000] {
                let (output, _) = calculate_output(r_in, r_out, input, fee_bps);
                assert!(output < previous, "fee {fee_bps} did not reduce output");
                previous = output;
            }
        }
    }

    #[test]
    fn test_simulate_swap_scenario() {
        let pool = make_pool(1_000_000, 4_000_000, 25);
        let quote = simulate_swap(&pool, &pool.mint_a.mint, 10_000, 0).unwrap();
        assert_eq!(quote.amount_out, 39_505);
        assert_eq!(quote.fee_amount, 25);
        // (40_000 - 39_505) / 40_000
        assert_eq!(quote.price_impact.ppm(), 12_375);
        assert!(quote.tick_arrays.is_empty());

        // reverse direction uses the other reserve as input
        let reverse = simulate_swap(&pool, &pool.mint_b.mint, 40_000, 0).unwrap();
        let (expected, _) = calculate_output(4_000_000, 1_000_000, 40_000, 25);
        assert_eq!(reverse.amount_out, expected);
    }

    #[test]
    fn test_simulate_swap_inactive() {
        let mut pool = make_pool(1_000_000, 4_000_000, 25);
        pool.open_time = 1_700_000_000;
        let err = simulate_swap(&pool, &pool.mint_a.mint, 10_000, 1_600_000_000).unwrap_err();
        assert!(matches!(err, SimulationError::PoolInactive { .. }));
    }

    #[test]
    fn test_simulate_swap_insufficient_liquidity() {
        let pool = make_pool(0, 4_000_000, 25);
        let err = simulate_swap(&pool, &pool.mint_a.mint, 10_000, 0).unwrap_err();
        assert_eq!(err, SimulationError::InsufficientLiquidity { pool: pool.id });

        // dust that rounds to nothing
        let pool = make_pool(1_000_000_000, 10, 25);
        let err = simulate_swap(&pool, &pool.mint_a.mint, 1_000, 0).unwrap_err();
        assert_eq!(err, SimulationError::InsufficientLiquidity { pool: pool.id });
    }

    #[test]
    fn test_simulate_swap_unknown_mint() {
        let pool = make_pool(1_000, 1_000, 25);
        let err = simulate_swap(&pool, &Pubkey::new_unique(), 10, 0).unwrap_err();
        assert_eq!(err.error_code(), "invalid_token");
    }
}
