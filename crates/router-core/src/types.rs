//! Core type definitions for the swap router

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use crate::math::{Price, PriceImpact};

/// Token program a mint is owned by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenProgram {
    #[default]
    Spl,
    Token2022,
}

impl TokenProgram {
    pub fn id(&self) -> Pubkey {
        match self {
            Self::Spl => spl_token::id(),
            Self::Token2022 => spl_token_2022::id(),
        }
    }

    pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
        if *program_id == spl_token::id() {
            Some(Self::Spl)
        } else if *program_id == spl_token_2022::id() {
            Some(Self::Token2022)
        } else {
            None
        }
    }
}

impl fmt::Display for TokenProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spl => write!(f, "spl-token"),
            Self::Token2022 => write!(f, "token-2022"),
        }
    }
}

/// A mint together with the metadata needed to build instructions for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub mint: Pubkey,
    pub decimals: u8,
    #[serde(default)]
    pub program: TokenProgram,
}

impl Token {
    pub fn new(mint: Pubkey, decimals: u8, program: TokenProgram) -> Self {
        Self {
            mint,
            decimals,
            program,
        }
    }

    /// Wrapped SOL
    pub fn native() -> Self {
        Self::new(spl_token::native_mint::id(), 9, TokenProgram::Spl)
    }

    pub fn is_native(&self) -> bool {
        self.mint == spl_token::native_mint::id()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.mint, self.program)
    }
}

/// Integrator fee taken from the input before routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub fee_bps: u16,
    /// Token account receiving the fee
    pub fee_account: Pubkey,
}

/// Result of simulating one hop through one pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    /// Fee charged by the pool, denominated in the input token
    pub fee_amount: u64,
    pub price_impact: PriceImpact,
    /// Pool price (output per input) before the swap
    pub spot_price: Price,
    /// Start indices of the tick arrays the swap traverses, in order.
    /// Empty for constant-product pools.
    pub tick_arrays: Vec<i32>,
}
