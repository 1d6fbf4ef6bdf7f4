//! Pool state across both curve kinds

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use amm::AmmPool;
use clmm::{ClmmPool, TickArrays};
use router_core::{SimulationError, SwapQuote, Token};

/// Curve a pool prices trades with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    ConstantProduct,
    Concentrated,
}

/// Decoded pool as supplied by the pool source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolState {
    ConstantProduct(AmmPool),
    Concentrated(ClmmPool),
}

impl PoolState {
    pub fn id(&self) -> Pubkey {
        match self {
            Self::ConstantProduct(pool) => pool.id,
            Self::Concentrated(pool) => pool.id,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        match self {
            Self::ConstantProduct(pool) => pool.program_id,
            Self::Concentrated(pool) => pool.program_id,
        }
    }

    pub fn kind(&self) -> PoolKind {
        match self {
            Self::ConstantProduct(_) => PoolKind::ConstantProduct,
            Self::Concentrated(_) => PoolKind::Concentrated,
        }
    }

    pub fn tokens(&self) -> (Token, Token) {
        match self {
            Self::ConstantProduct(pool) => (pool.mint_a, pool.mint_b),
            Self::Concentrated(pool) => (pool.mint_a, pool.mint_b),
        }
    }

    pub fn is_active(&self, now: i64) -> bool {
        match self {
            Self::ConstantProduct(pool) => pool.is_active(now),
            Self::Concentrated(pool) => pool.is_active(now),
        }
    }

    /// Whether the pool can trade at all. A concentrated pool with no
    /// liquidity at its current tick may still reach some by crossing, so
    /// only the simulator can rule it out.
    pub fn has_liquidity(&self) -> bool {
        match self {
            Self::ConstantProduct(pool) => pool.reserve_a > 0 && pool.reserve_b > 0,
            Self::Concentrated(_) => true,
        }
    }

    /// Whether the pool program can move both of its mints
    pub fn supports_tokens(&self) -> bool {
        match self {
            Self::ConstantProduct(pool) => pool.supports_token_programs(),
            Self::Concentrated(_) => true,
        }
    }

    /// Simulate an exact-input swap of `amount_in` of `input_mint`.
    ///
    /// `tick_arrays` is only read for concentrated pools.
    pub fn simulate_swap(
        &self,
        tick_arrays: Option<&TickArrays>,
        input_mint: &Pubkey,
        amount_in: u64,
        now: i64,
    ) -> Result<SwapQuote, SimulationError> {
        match self {
            Self::ConstantProduct(pool) => amm::simulate_swap(pool, input_mint, amount_in, now),
            Self::Concentrated(pool) => {
                clmm::simulate_swap(pool, tick_arrays, input_mint, amount_in, now)
            }
        }
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantProduct(pool) => pool.fmt(f),
            Self::Concentrated(pool) => pool.fmt(f),
        }
    }
}
