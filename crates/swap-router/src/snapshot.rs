//! Pool Snapshot
//!
//! One consistent view of pool state and tick data, fetched once per
//! request and never mutated while a route is computed against it.

use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use tracing::{debug, info};

use clmm::TickArrays;
use router_core::{RoutingError, SimulationError, SourceError, SwapQuote};

use crate::pool::PoolState;
use crate::source::{PoolSource, ProgramFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub pools: Vec<PoolState>,
    /// Tick arrays of concentrated pools by pool id
    pub tick_arrays: HashMap<Pubkey, TickArrays>,
    /// Unix time the pool data was read
    pub fetched_at: i64,
}

impl PoolSnapshot {
    pub fn new(pools: Vec<PoolState>, tick_arrays: HashMap<Pubkey, TickArrays>, fetched_at: i64) -> Self {
        Self {
            pools,
            tick_arrays,
            fetched_at,
        }
    }

    /// Fetch the pool list, then tick data for every concentrated pool in it.
    ///
    /// Pools outside `filter` are dropped even if the source returns them.
    pub async fn fetch<S: PoolSource + ?Sized>(
        source: &S,
        filter: &ProgramFilter,
        now: i64,
    ) -> Result<Self, SourceError> {
        let mut pools = source.fetch_pool_list(filter).await?;
        let fetched = pools.len();
        pools.retain(|pool| filter.matches(&pool.program_id()));
        if pools.len() < fetched {
            debug!(dropped = fetched - pools.len(), "pools outside program filter");
        }

        let concentrated: Vec<Pubkey> = pools
            .iter()
            .filter(|pool| matches!(pool, PoolState::Concentrated(_)))
            .map(PoolState::id)
            .collect();
        let tick_arrays = if concentrated.is_empty() {
            HashMap::new()
        } else {
            source.fetch_tick_arrays(&concentrated).await?
        };

        info!(
            pools = pools.len(),
            concentrated = concentrated.len(),
            tick_data = tick_arrays.len(),
            "fetched pool snapshot"
        );
        Ok(Self::new(pools, tick_arrays, now))
    }

    /// Reject a snapshot older than `max_age_secs` at `now`
    pub fn check_fresh(&self, now: i64, max_age_secs: Option<u64>) -> Result<(), RoutingError> {
        let Some(max_age_secs) = max_age_secs else {
            return Ok(());
        };
        let age = now.saturating_sub(self.fetched_at);
        if age > 0 && age.unsigned_abs() > max_age_secs {
            return Err(RoutingError::StaleSnapshot {
                fetched_at: self.fetched_at,
                now,
                max_age_secs,
            });
        }
        Ok(())
    }

    pub fn pool(&self, id: &Pubkey) -> Option<&PoolState> {
        self.pools.iter().find(|pool| pool.id() == *id)
    }

    /// Simulate one hop through `pool` with this snapshot's tick data
    pub fn simulate_hop(
        &self,
        pool: &PoolState,
        input_mint: &Pubkey,
        amount_in: u64,
        now: i64,
    ) -> Result<SwapQuote, SimulationError> {
        pool.simulate_swap(self.tick_arrays.get(&pool.id()), input_mint, amount_in, now)
    }
}
