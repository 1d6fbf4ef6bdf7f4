//! AMM Constants
//!
//! Program ids and instruction layout for Raydium AMM v4 pools.

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Raydium liquidity pool v4 (mainnet)
pub const AMM_V4_PROGRAM_ID: Pubkey = pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");

/// OpenBook market program the v4 pools settle against (mainnet)
pub const OPENBOOK_PROGRAM_ID: Pubkey = pubkey!("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX");

/// Instruction tags
pub mod instructions {
    /// Exact-input swap
    pub const SWAP_BASE_IN: u8 = 9;

    /// Number of accounts passed to SwapBaseIn
    pub const SWAP_BASE_IN_ACCOUNTS: usize = 18;
}

/// Fee constants
pub mod fees {
    /// Trade fee of the standard v4 pool (0.25%)
    pub const DEFAULT_FEE_BPS: u16 = 25;
}
