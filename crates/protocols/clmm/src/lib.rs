//! Concentrated-Liquidity Pool Implementation
//!
//! Exact integer replication of Raydium CLMM swap math (Q64.64 square-root
//! prices, tick crossing, per-million fees) plus the `swap_v2` encoder.

pub mod calculator;
pub mod constants;
pub mod state;
pub mod swap_math;
pub mod tick_math;
pub mod tx_builder;

// Re-exports
pub use calculator::{simulate_swap, sqrt_price_limit};
pub use constants::{fees, instructions, ticks, CLMM_PROGRAM_ID, MEMO_PROGRAM_ID};
pub use state::{
    tick_array_span, tick_array_start_index, ClmmPool, NextTick, TickArray, TickArrays, TickState,
};
pub use swap_math::{compute_swap_step, SwapStep};
pub use tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
pub use tx_builder::{build_swap_instruction, swap_v2_data, tick_array_address, UserSwapAccounts};
