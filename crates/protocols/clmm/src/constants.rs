//! CLMM Constants
//!
//! Program ids, tick bounds and instruction layout for Raydium CLMM pools.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Raydium concentrated liquidity program (mainnet)
pub const CLMM_PROGRAM_ID: Pubkey = pubkey!("CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK");

/// SPL memo program referenced by swap_v2
pub const MEMO_PROGRAM_ID: Pubkey = pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// Tick bounds and fixed-point limits
pub mod ticks {
    pub const MIN_TICK: i32 = -443_636;
    pub const MAX_TICK: i32 = 443_636;

    /// sqrt(1.0001^MIN_TICK) in Q64.64
    pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;
    /// sqrt(1.0001^MAX_TICK) in Q64.64
    pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_521_066_979_257_578_248_091;

    /// Initializable tick slots per tick array account
    pub const TICK_ARRAY_SIZE: i32 = 60;

    pub const TICK_ARRAY_SEED: &[u8] = b"tick_array";
}

/// Fee constants
pub mod fees {
    /// Fee rates are expressed per million
    pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;
}

/// Instruction discriminators and sizes
pub mod instructions {
    /// Anchor discriminator of `swap_v2`
    pub const SWAP_V2_DISCRIMINATOR: [u8; 8] = [43, 4, 237, 11, 26, 201, 30, 98];

    /// Fixed accounts before the tick-array remaining accounts
    pub const SWAP_V2_FIXED_ACCOUNTS: usize = 13;
}
