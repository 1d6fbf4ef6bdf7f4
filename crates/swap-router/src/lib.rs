//! Swap Router
//!
//! Finds, simulates and selects swap routes across constant-product and
//! concentrated-liquidity pools, then assembles the transactions that
//! execute them.
//!
//! ```text
//! PoolSource -> PoolSnapshot -> PoolGraph -> CandidatePath
//!            -> SimulatedPath -> Route -> PlannedInstruction -> TransactionBundle
//! ```

pub mod evaluate;
pub mod graph;
pub mod instructions;
pub mod pool;
pub mod select;
pub mod snapshot;
pub mod source;
pub mod telemetry;

use serde::{Deserialize, Serialize};
use solana_sdk::signature::Signature;
use tracing::{debug, info};

use router_core::{
    split_fee, BuildError, Error, FeeConfig, RouterConfig, RoutingError, SelectionPolicy, Token,
    BPS_DENOMINATOR,
};
use solana_tx::{pack, TransactionBundle, WalletContext};

// Re-exports
pub use evaluate::{evaluate, SimulatedHop, SimulatedPath};
pub use graph::{build_pool_graph, enumerate_routes, CandidatePath, Edge, PoolGraph};
pub use instructions::build_instructions;
pub use pool::{PoolKind, PoolState};
pub use select::{rank, select_best, select_split, FeeCharge, Route};
pub use snapshot::PoolSnapshot;
pub use source::{load_wallet, PoolSource, ProgramFilter, TransactionSubmitter};

/// Exact-input swap request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub input: Token,
    pub output: Token,
    /// Input spent, integrator fee included
    pub amount_in: u64,
    pub slippage_bps: u16,
    /// Overrides the configured hop bound
    #[serde(default)]
    pub max_hops: Option<usize>,
    #[serde(default)]
    pub fee_config: Option<FeeConfig>,
    /// Chain time used for pool activation and snapshot age
    pub now: i64,
}

impl RouteRequest {
    pub fn new(input: Token, output: Token, amount_in: u64, slippage_bps: u16, now: i64) -> Self {
        Self {
            input,
            output,
            amount_in,
            slippage_bps,
            max_hops: None,
            fee_config: None,
            now,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    pub fn with_fee(mut self, fee_config: FeeConfig) -> Self {
        self.fee_config = Some(fee_config);
        self
    }

    fn validate(&self) -> Result<(), RoutingError> {
        let invalid = |message: &str| {
            Err(RoutingError::InvalidRequest {
                message: message.to_string(),
            })
        };
        if self.amount_in == 0 {
            return invalid("amount_in must be positive");
        }
        if u64::from(self.slippage_bps) > BPS_DENOMINATOR {
            return invalid("slippage_bps exceeds 10000");
        }
        if self.input.mint == self.output.mint {
            return invalid("input and output mints are the same");
        }
        if self
            .fee_config
            .is_some_and(|fee| u64::from(fee.fee_bps) > BPS_DENOMINATOR)
        {
            return invalid("fee_bps exceeds 10000");
        }
        Ok(())
    }
}

/// Entry point tying discovery, selection and transaction assembly together
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Router configured from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|e| Error::Config(format!("invalid router config: {e}")))
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Compute the route for `request` against one snapshot.
    ///
    /// The integrator fee is floored out of the input first; the rest is
    /// routed. Identical snapshots and requests always give identical routes.
    pub fn compute_route(
        &self,
        snapshot: &PoolSnapshot,
        request: &RouteRequest,
    ) -> Result<Route, RoutingError> {
        request.validate()?;
        snapshot.check_fresh(request.now, self.config.snapshot_max_age_secs)?;

        let (fee, amount) = match request.fee_config {
            Some(config) => {
                let (fee, rest) = split_fee(request.amount_in, config.fee_bps);
                (Some(FeeCharge { config, amount: fee }), rest)
            }
            None => (None, request.amount_in),
        };
        if amount == 0 {
            return Err(RoutingError::InvalidRequest {
                message: "nothing left to swap after the integrator fee".to_string(),
            });
        }

        let graph = build_pool_graph(&snapshot.pools, request.now);
        let max_hops = request.max_hops.unwrap_or(self.config.max_hops);
        let candidates = enumerate_routes(&graph, &request.input.mint, &request.output.mint, max_hops);

        let evaluated: Vec<Result<SimulatedPath, RoutingError>> = candidates
            .iter()
            .map(|path| {
                let result = evaluate(snapshot, path, amount, request.slippage_bps, request.now);
                if let Err(e) = &result {
                    debug!(code = e.error_code(), error = %e, "candidate path failed");
                }
                result
            })
            .collect();

        let best = select_best(&evaluated, &request.input.mint, &request.output.mint)?;
        let paths = match self.config.selection {
            SelectionPolicy::SingleBest => vec![best],
            SelectionPolicy::Split { max_paths, steps } => select_split(
                snapshot,
                &evaluated,
                max_paths,
                steps,
                request.slippage_bps,
                request.now,
            )
            .unwrap_or_else(|| vec![best]),
        };

        let route = Route::new(request.input, request.output, request.slippage_bps, paths, fee);
        info!(
            input = %request.input.mint,
            output = %request.output.mint,
            candidates = candidates.len(),
            paths = route.paths.len(),
            amount_in = route.amount_in,
            amount_out = route.amount_out,
            minimum_out = route.minimum_amount_out,
            impact = %route.price_impact,
            "computed route"
        );
        Ok(route)
    }

    /// Build and pack the transactions executing `route`.
    ///
    /// Either every bundle is returned or none.
    pub fn build_transactions(
        &self,
        route: &Route,
        wallet: &WalletContext,
    ) -> Result<Vec<TransactionBundle>, BuildError> {
        let planned = build_instructions(route, wallet, self.config.wrap_native)?;
        pack(
            &planned,
            &wallet.owner,
            &self.config.packing,
            self.config.compute_budget.as_ref(),
        )
    }

    /// Build the transactions for `route` and hand them to `submitter`
    pub async fn execute<T: TransactionSubmitter + ?Sized>(
        &self,
        submitter: &T,
        route: &Route,
        wallet: &WalletContext,
    ) -> Result<Vec<Signature>, Error> {
        let bundles = self.build_transactions(route, wallet)?;
        info!(transactions = bundles.len(), "submitting route");
        Ok(submitter.sign_and_submit(&bundles).await?)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use amm::{AmmPool, AmmPoolKeys};
    use clmm::{ClmmPool, TickArray, TickArrays, TickState};
    use router_core::{FeeConfig, RouterConfig, SourceError, Token, TokenProgram};

    use crate::pool::PoolState;
    use crate::snapshot::PoolSnapshot;
    use crate::source::{PoolSource, ProgramFilter};
    use crate::{Route, RouteRequest, Router};

    pub fn make_token() -> Token {
        Token::new(Pubkey::new_unique(), 6, TokenProgram::Spl)
    }

    pub fn make_amm_pool(
        mint_a: Token,
        mint_b: Token,
        reserve_a: u64,
        reserve_b: u64,
        fee_bps: u16,
    ) -> PoolState {
        PoolState::ConstantProduct(AmmPool {
            id: Pubkey::new_unique(),
            program_id: amm::AMM_V4_PROGRAM_ID,
            mint_a,
            mint_b,
            reserve_a,
            reserve_b,
            fee_bps,
            open_time: 0,
            keys: AmmPoolKeys {
                authority: Pubkey::new_unique(),
                open_orders: Pubkey::new_unique(),
                target_orders: Pubkey::new_unique(),
                vault_a: Pubkey::new_unique(),
                vault_b: Pubkey::new_unique(),
                market_program_id: amm::OPENBOOK_PROGRAM_ID,
                market_id: Pubkey::new_unique(),
                market_bids: Pubkey::new_unique(),
                market_asks: Pubkey::new_unique(),
                market_event_queue: Pubkey::new_unique(),
                market_vault_a: Pubkey::new_unique(),
                market_vault_b: Pubkey::new_unique(),
                market_authority: Pubkey::new_unique(),
            },
        })
    }

    /// Pool at tick 0 (price 1) with 1.5e12 active liquidity, spacing 10, 0.25% fee
    pub fn make_clmm_pool(mint_a: Token, mint_b: Token) -> PoolState {
        PoolState::Concentrated(ClmmPool {
            id: Pubkey::new_unique(),
            program_id: clmm::CLMM_PROGRAM_ID,
            amm_config: Pubkey::new_unique(),
            observation: Pubkey::new_unique(),
            mint_a,
            mint_b,
            vault_a: Pubkey::new_unique(),
            vault_b: Pubkey::new_unique(),
            tick_spacing: 10,
            liquidity: 1_500_000_000_000,
            sqrt_price_x64: 1u128 << 64,
            tick_current: 0,
            fee_rate: 2_500,
            open_time: 0,
        })
    }

    fn tick(tick: i32, liquidity_net: i128) -> TickState {
        TickState {
            tick,
            liquidity_net,
            liquidity_gross: liquidity_net.unsigned_abs(),
        }
    }

    /// Positions [-300, 300] with 1e12 and [-500, 200] with 5e11
    pub fn make_tick_arrays() -> TickArrays {
        TickArrays::new([
            TickArray {
                start_tick_index: 0,
                ticks: vec![tick(200, -500_000_000_000), tick(300, -1_000_000_000_000)],
            },
            TickArray {
                start_tick_index: -600,
                ticks: vec![tick(-500, 500_000_000_000), tick(-300, 1_000_000_000_000)],
            },
        ])
    }

    /// Best single-path route with the default configuration
    pub fn make_route(
        pools: Vec<PoolState>,
        tick_arrays: HashMap<Pubkey, TickArrays>,
        input: Token,
        output: Token,
        amount_in: u64,
        slippage_bps: u16,
        fee: Option<FeeConfig>,
    ) -> Route {
        let snapshot = PoolSnapshot::new(pools, tick_arrays, 0);
        let mut request = RouteRequest::new(input, output, amount_in, slippage_bps, 0);
        request.fee_config = fee;
        Router::new(RouterConfig::default())
            .compute_route(&snapshot, &request)
            .unwrap()
    }

    /// In-memory pool source recording tick-array requests
    #[derive(Default)]
    pub struct StaticSource {
        pub pools: Vec<PoolState>,
        pub tick_arrays: HashMap<Pubkey, TickArrays>,
        pub token_accounts: HashMap<Pubkey, Pubkey>,
        pub unavailable: bool,
        pub requests: Mutex<Vec<Vec<Pubkey>>>,
    }

    impl StaticSource {
        pub fn tick_requests(&self) -> Vec<Vec<Pubkey>> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn check(&self) -> Result<(), SourceError> {
            if self.unavailable {
                return Err(SourceError::Unavailable {
                    message: "store offline".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PoolSource for StaticSource {
        async fn fetch_pool_list(&self, _filter: &ProgramFilter) -> Result<Vec<PoolState>, SourceError> {
            self.check()?;
            Ok(self.pools.clone())
        }

        async fn fetch_tick_arrays(
            &self,
            pool_ids: &[Pubkey],
        ) -> Result<HashMap<Pubkey, TickArrays>, SourceError> {
            self.check()?;
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(pool_ids.to_vec());
            }
            Ok(pool_ids
                .iter()
                .filter_map(|id| self.tick_arrays.get(id).map(|arrays| (*id, arrays.clone())))
                .collect())
        }

        async fn fetch_wallet_token_accounts(
            &self,
            _owner: &Pubkey,
        ) -> Result<HashMap<Pubkey, Pubkey>, SourceError> {
            self.check()?;
            Ok(self.token_accounts.clone())
        }
    }
}
