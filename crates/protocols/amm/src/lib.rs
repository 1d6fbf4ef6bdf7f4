//! Constant-Product AMM Implementation
//!
//! This crate simulates swaps through Raydium AMM v4 style pools and encodes
//! the exact-input swap instruction those pools accept.

pub mod calculator;
pub mod constants;
pub mod state;
pub mod tx_builder;

// Re-exports
pub use calculator::{calculate_fee, calculate_output, simulate_swap, spot_price};
pub use constants::{fees, instructions, AMM_V4_PROGRAM_ID, OPENBOOK_PROGRAM_ID};
pub use state::{AmmPool, AmmPoolKeys, OrientedReserves};
pub use tx_builder::{build_swap_instruction, swap_base_in_data, UserSwapAccounts};
