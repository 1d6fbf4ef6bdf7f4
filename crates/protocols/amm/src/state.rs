//! AMM State Types
//!
//! Decoded view of a constant-product pool and the market accounts its
//! swap instruction needs.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use router_core::{SimulationError, Token, TokenProgram};

/// Accounts a v4 swap references besides the pool itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmPoolKeys {
    pub authority: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    /// Pool vault holding `mint_a` (base / coin)
    pub vault_a: Pubkey,
    /// Pool vault holding `mint_b` (quote / pc)
    pub vault_b: Pubkey,
    pub market_program_id: Pubkey,
    pub market_id: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
    pub market_vault_a: Pubkey,
    pub market_vault_b: Pubkey,
    pub market_authority: Pubkey,
}

/// Constant-product pool state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmPool {
    pub id: Pubkey,
    pub program_id: Pubkey,

    /// Base side
    pub mint_a: Token,
    /// Quote side
    pub mint_b: Token,

    pub reserve_a: u64,
    pub reserve_b: u64,

    /// Trade fee in basis points, taken from the input
    pub fee_bps: u16,
    /// Unix time the pool opens for swaps
    #[serde(default)]
    pub open_time: i64,

    pub keys: AmmPoolKeys,
}

/// Reserves oriented along a swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedReserves {
    pub reserve_in: u64,
    pub reserve_out: u64,
    /// True when swapping `mint_a` into `mint_b`
    pub a_to_b: bool,
}

impl AmmPool {
    pub fn is_active(&self, now: i64) -> bool {
        self.open_time <= now
    }

    /// Whether the v4 program can move both mints
    pub fn supports_token_programs(&self) -> bool {
        self.mint_a.program == TokenProgram::Spl && self.mint_b.program == TokenProgram::Spl
    }

    pub fn orient(&self, input_mint: &Pubkey) -> Result<OrientedReserves, SimulationError> {
        if *input_mint == self.mint_a.mint {
            Ok(OrientedReserves {
                reserve_in: self.reserve_a,
                reserve_out: self.reserve_b,
                a_to_b: true,
            })
        } else if *input_mint == self.mint_b.mint {
            Ok(OrientedReserves {
                reserve_in: self.reserve_b,
                reserve_out: self.reserve_a,
                a_to_b: false,
            })
        } else {
            Err(SimulationError::InvalidToken {
                pool: self.id,
                mint: *input_mint,
            })
        }
    }
}

impl fmt::Display for AmmPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AMM Pool {} | A: {} | B: {} | fee {}bps",
            self.id, self.reserve_a, self.reserve_b, self.fee_bps
        )
    }
}
