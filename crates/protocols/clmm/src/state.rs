//! CLMM State Types
//!
//! Decoded pool state and the tick arrays loaded alongside it.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::fmt;

use router_core::{Price, SimulationError, Token};

use crate::constants::ticks::TICK_ARRAY_SIZE;

/// Concentrated-liquidity pool state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClmmPool {
    pub id: Pubkey,
    pub program_id: Pubkey,
    pub amm_config: Pubkey,
    pub observation: Pubkey,

    /// Token 0; its price in B is sqrt_price^2
    pub mint_a: Token,
    /// Token 1
    pub mint_b: Token,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,

    pub tick_spacing: u16,
    /// Active liquidity at the current price
    pub liquidity: u128,
    /// Q64.64
    pub sqrt_price_x64: u128,
    pub tick_current: i32,
    /// Trade fee per 1_000_000
    pub fee_rate: u32,
    #[serde(default)]
    pub open_time: i64,
}

/// An initialized tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickState {
    pub tick: i32,
    /// Liquidity added when crossing this tick left to right
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
}

/// One tick array account; only initialized ticks are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickArray {
    pub start_tick_index: i32,
    pub ticks: Vec<TickState>,
}

/// Next tick a swap walks to within the loaded arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTick {
    /// An initialized tick whose liquidity changes on crossing
    Initialized { tick: i32, liquidity_net: i128 },
    /// Edge of the contiguous loaded range; nothing is known beyond it
    Boundary { tick: i32 },
}

impl NextTick {
    pub fn tick(&self) -> i32 {
        match self {
            Self::Initialized { tick, .. } | Self::Boundary { tick } => *tick,
        }
    }
}

/// Tick arrays of one pool keyed by start index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickArrays {
    arrays: BTreeMap<i32, TickArray>,
}

/// Ticks covered by one array account
pub fn tick_array_span(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE * i32::from(tick_spacing)
}

/// Start index of the array containing `tick` (floored toward -inf)
pub fn tick_array_start_index(tick: i32, tick_spacing: u16) -> i32 {
    let span = tick_array_span(tick_spacing);
    tick.div_euclid(span) * span
}

impl TickArrays {
    pub fn new(arrays: impl IntoIterator<Item = TickArray>) -> Self {
        Self {
            arrays: arrays
                .into_iter()
                .map(|array| (array.start_tick_index, array))
                .collect(),
        }
    }

    pub fn contains(&self, start_index: i32) -> bool {
        self.arrays.contains_key(&start_index)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn start_indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.arrays.keys().copied()
    }

    /// Find the next tick a swap from `tick` reaches.
    ///
    /// Moving down (`a_to_b`) the search includes `tick` itself; moving up it
    /// starts strictly above. Every array inspected is appended to `visited`.
    pub fn next_initialized_tick(
        &self,
        tick: i32,
        tick_spacing: u16,
        a_to_b: bool,
        visited: &mut Vec<i32>,
    ) -> NextTick {
        let span = tick_array_span(tick_spacing);
        let mut start = tick_array_start_index(tick, tick_spacing);
        loop {
            let Some(array) = self.arrays.get(&start) else {
                let edge = if a_to_b { start + span } else { start };
                return NextTick::Boundary { tick: edge };
            };
            if visited.last() != Some(&start) {
                visited.push(start);
            }

            let initialized = array.ticks.iter().filter(|t| t.liquidity_gross > 0);
            let found = if a_to_b {
                initialized.filter(|t| t.tick <= tick).max_by_key(|t| t.tick)
            } else {
                initialized.filter(|t| t.tick > tick).min_by_key(|t| t.tick)
            };
            if let Some(next) = found {
                return NextTick::Initialized {
                    tick: next.tick,
                    liquidity_net: next.liquidity_net,
                };
            }

            start = if a_to_b { start - span } else { start + span };
        }
    }
}

impl ClmmPool {
    pub fn is_active(&self, now: i64) -> bool {
        self.open_time <= now
    }

    /// True when swapping `mint_a` into `mint_b`
    pub fn direction(&self, input_mint: &Pubkey) -> Result<bool, SimulationError> {
        if *input_mint == self.mint_a.mint {
            Ok(true)
        } else if *input_mint == self.mint_b.mint {
            Ok(false)
        } else {
            Err(SimulationError::InvalidToken {
                pool: self.id,
                mint: *input_mint,
            })
        }
    }

    pub fn current_tick_array(&self) -> i32 {
        tick_array_start_index(self.tick_current, self.tick_spacing)
    }

    /// Pool price in output units per input unit
    pub fn spot_price(&self, a_to_b: bool) -> Price {
        let price_squared = BigUint::from(self.sqrt_price_x64).pow(2);
        let q128 = BigUint::from(1u8) << 128;
        if a_to_b {
            Price::new(price_squared, q128)
        } else {
            Price::new(q128, price_squared)
        }
    }
}

impl fmt::Display for ClmmPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLMM Pool {} | tick {} | L {} | fee {}/1e6",
            self.id, self.tick_current, self.liquidity, self.fee_rate
        )
    }
}
