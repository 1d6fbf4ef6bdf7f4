//! CLMM Calculator
//!
//! Exact-input swap simulation that walks initialized ticks across the
//! loaded tick arrays, one constant-liquidity segment at a time.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use router_core::{PriceImpact, SimulationError, SwapQuote};

use crate::constants::ticks::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::state::{tick_array_start_index, ClmmPool, NextTick, TickArrays};
use crate::swap_math::compute_swap_step;
use crate::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};

/// Price bound passed to the program: one unit inside the valid range
pub fn sqrt_price_limit(a_to_b: bool) -> u128 {
    if a_to_b {
        MIN_SQRT_PRICE_X64 + 1
    } else {
        MAX_SQRT_PRICE_X64 - 1
    }
}

/// Simulate an exact-input swap through a concentrated-liquidity pool.
///
/// `tick_arrays` must contain at least the array holding the current tick.
/// Running past the loaded arrays with input left fails with
/// `InsufficientLiquidity`; partial fills are never reported.
pub fn simulate_swap(
    pool: &ClmmPool,
    tick_arrays: Option<&TickArrays>,
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
    let a_to_b = pool.direction(input_mint)?;

    let current_start = pool.current_tick_array();
    let arrays = tick_arrays
        .filter(|arrays| arrays.contains(current_start))
        .ok_or(SimulationError::TickDataMissing {
            pool: pool.id,
            start_index: current_start,
        })?;

    let overflow = || SimulationError::MathOverflow { pool: pool.id };
    let limit = sqrt_price_limit(a_to_b);

    let mut remaining = amount_in;
    let mut amount_out: u64 = 0;
    let mut fee_amount: u64 = 0;
    let mut sqrt_price = pool.sqrt_price_x64;
    let mut tick = pool.tick_current;
    let mut liquidity = pool.liquidity;
    let mut visited = vec![current_start];

    while remaining > 0 && sqrt_price != limit {
        let next = arrays.next_initialized_tick(tick, pool.tick_spacing, a_to_b, &mut visited);
        let tick_next = next.tick().clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next_tick = get_sqrt_price_at_tick(tick_next).ok_or_else(overflow)?;
        let target = if a_to_b {
            sqrt_price_next_tick.max(limit)
        } else {
            sqrt_price_next_tick.min(limit)
        };

        let step = compute_swap_step(sqrt_price, target, liquidity, remaining, pool.fee_rate)
            .ok_or_else(overflow)?;
        remaining = step
            .amount_in
            .checked_add(step.fee_amount)
            .and_then(|spent| remaining.checked_sub(spent))
            .ok_or_else(overflow)?;
        amount_out = amount_out.checked_add(step.amount_out).ok_or_else(overflow)?;
        fee_amount = fee_amount.checked_add(step.fee_amount).ok_or_else(overflow)?;

        if step.sqrt_price_next == sqrt_price_next_tick {
            match next {
                NextTick::Initialized { liquidity_net, .. } => {
                    let net = if a_to_b {
                        liquidity_net.checked_neg().ok_or_else(overflow)?
                    } else {
                        liquidity_net
                    };
                    liquidity = liquidity.checked_add_signed(net).ok_or_else(overflow)?;
                }
                NextTick::Boundary { .. } if remaining > 0 => {
                    debug!(pool = %pool.id, tick = tick_next, remaining, "swap ran past loaded tick arrays");
                    return Err(SimulationError::InsufficientLiquidity { pool: pool.id });
                }
                NextTick::Boundary { .. } => {}
            }
            tick = if a_to_b { tick_next - 1 } else { tick_next };
        } else if step.sqrt_price_next != sqrt_price {
            tick = get_tick_at_sqrt_price(step.sqrt_price_next).ok_or_else(overflow)?;
        }
        sqrt_price = step.sqrt_price_next;

        let start = tick_array_start_index(tick, pool.tick_spacing);
        if arrays.contains(start) && visited.last() != Some(&start) {
            visited.push(start);
        }
    }

    if remaining > 0 || amount_out == 0 {
        return Err(SimulationError::InsufficientLiquidity { pool: pool.id });
    }

    let spot_price = pool.spot_price(a_to_b);
    let price_impact = PriceImpact::from_execution(amount_in, amount_out, &spot_price);
    visited.dedup();

    Ok(SwapQuote {
        amount_in,
        amount_out,
        fee_amount,
        price_impact,
        spot_price,
        tick_arrays: visited,
    })
}
