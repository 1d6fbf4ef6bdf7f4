//! Route Evaluator
//!
//! Chains the curve simulators along a candidate path, feeding each hop's
//! output into the next, and derives the path's slippage-bounded minimum.
//!
//! Hops execute as separate instructions, so a hop can only spend what the
//! hop before it guarantees. Each hop after the first is therefore also
//! simulated from the previous hop's minimum, and its own minimum is taken
//! from that result.

use solana_sdk::pubkey::Pubkey;

use router_core::{apply_slippage, Price, PriceImpact, RoutingError, Token};

use crate::graph::CandidatePath;
use crate::pool::PoolState;
use crate::snapshot::PoolSnapshot;

/// One simulated swap within a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedHop {
    pub pool: PoolState,
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: u64,
    pub amount_out: u64,
    /// Input the hop's instruction spends: the path input on the first hop,
    /// the previous hop's minimum afterwards
    pub guaranteed_in: u64,
    /// Output of `guaranteed_in` less slippage
    pub minimum_amount_out: u64,
    /// Charged in `token_in`
    pub fee_amount: u64,
    pub price_impact: PriceImpact,
    /// Pool price before the hop, `token_out` per `token_in`
    pub spot_price: Price,
    /// Tick arrays the hop walks (concentrated pools only)
    pub tick_arrays: Vec<i32>,
}

impl SimulatedHop {
    pub fn pool_id(&self) -> Pubkey {
        self.pool.id()
    }
}

/// A candidate path with every hop simulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedPath {
    pub path: CandidatePath,
    pub hops: Vec<SimulatedHop>,
    pub amount_in: u64,
    pub amount_out: u64,
    /// Minimum of the last hop
    pub minimum_amount_out: u64,
    /// Sum of hop fees converted to input-token units; reporting only
    pub fee_in_input: u64,
    /// Against the product of pre-trade hop prices
    pub price_impact: PriceImpact,
}

impl SimulatedPath {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// Pre-trade price of the whole path
    pub fn spot_price(&self) -> Price {
        self.hops
            .iter()
            .fold(Price::new(1u8, 1u8), |price, hop| price.then(&hop.spot_price))
    }
}

/// Simulate `amount_in` along `path` against `snapshot` at chain time `now`.
///
/// The first failing hop fails the path, tagged with its index and pool.
pub fn evaluate(
    snapshot: &PoolSnapshot,
    path: &CandidatePath,
    amount_in: u64,
    slippage_bps: u16,
    now: i64,
) -> Result<SimulatedPath, RoutingError> {
    if path.edges.is_empty() {
        return Err(RoutingError::InvalidRequest {
            message: "candidate path has no hops".to_string(),
        });
    }

    let mut hops = Vec::with_capacity(path.hops());
    let mut amount = amount_in;
    let mut fee_in_input: u64 = 0;
    // input-token price of the current hop's input
    let mut reached = Price::new(1u8, 1u8);

    for (index, edge) in path.edges.iter().enumerate() {
        let pool = snapshot
            .pools
            .get(edge.pool_index)
            .filter(|pool| pool.id() == edge.pool_id)
            .ok_or_else(|| RoutingError::InvalidRequest {
                message: format!("pool {} is not in the snapshot", edge.pool_id),
            })?;

        let quote = snapshot
            .simulate_hop(pool, &edge.token_in.mint, amount, now)
            .map_err(|e| RoutingError::hop(index, e))?;

        let fee = if index == 0 {
            Some(quote.fee_amount)
        } else {
            reached.to_input_units(quote.fee_amount)
        };
        fee_in_input = fee_in_input.saturating_add(fee.unwrap_or(0));
        reached = reached.then(&quote.spot_price);

        amount = quote.amount_out;
        hops.push(SimulatedHop {
            pool: pool.clone(),
            token_in: edge.token_in,
            token_out: edge.token_out,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            guaranteed_in: quote.amount_in,
            minimum_amount_out: 0,
            fee_amount: quote.fee_amount,
            price_impact: quote.price_impact,
            spot_price: quote.spot_price,
            tick_arrays: quote.tick_arrays,
        });
    }

    let minimum_amount_out = chain_minimums(snapshot, &mut hops, slippage_bps, now)?;

    Ok(SimulatedPath {
        path: path.clone(),
        amount_in,
        amount_out: amount,
        minimum_amount_out,
        fee_in_input,
        price_impact: PriceImpact::from_execution(amount_in, amount, &reached),
        hops,
    })
}

/// Fill in each hop's guaranteed input and minimum, returning the last minimum
fn chain_minimums(
    snapshot: &PoolSnapshot,
    hops: &mut [SimulatedHop],
    slippage_bps: u16,
    now: i64,
) -> Result<u64, RoutingError> {
    let mut guaranteed = hops.first().map_or(0, |hop| hop.amount_in);
    for (index, hop) in hops.iter_mut().enumerate() {
        hop.guaranteed_in = guaranteed;
        let out = if guaranteed == hop.amount_in {
            hop.amount_out
        } else if guaranteed == 0 {
            0
        } else {
            snapshot
                .simulate_hop(&hop.pool, &hop.token_in.mint, guaranteed, now)
                .map_err(|e| RoutingError::hop(index, e))?
                .amount_out
        };
        hop.minimum_amount_out = apply_slippage(out, slippage_bps);
        guaranteed = hop.minimum_amount_out;
    }
    Ok(guaranteed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_pool_graph, enumerate_routes};
    use crate::test_utils::{make_amm_pool, make_clmm_pool, make_tick_arrays, make_token};
    use router_core::SimulationError;
    use std::collections::HashMap;

    fn make_snapshot(pools: Vec<PoolState>) -> PoolSnapshot {
        let tick_arrays = pools
            .iter()
            .filter(|pool| matches!(pool, PoolState::Concentrated(_)))
            .map(|pool| (pool.id(), make_tick_arrays()))
            .collect();
        PoolSnapshot::new(pools, tick_arrays, 0)
    }

    fn only_path(snapshot: &PoolSnapshot, input: &Token, output: &Token) -> CandidatePath {
        let graph = build_pool_graph(&snapshot.pools, 0);
        let mut paths = enumerate_routes(&graph, &input.mint, &output.mint, 3);
        assert_eq!(paths.len(), 1);
        paths.remove(0)
    }

    #[test]
    fn test_single_hop_scenario() {
        let (a, b) = (make_token(), make_token());
        let snapshot = make_snapshot(vec![make_amm_pool(a, b, 1_000_000, 4_000_000, 25)]);
        let path = only_path(&snapshot, &a, &b);

        let simulated = evaluate(&snapshot, &path, 10_000, 50, 0).unwrap();
        assert_eq!(simulated.amount_out, 39_505);
        assert_eq!(simulated.hops[0].fee_amount, 25);
        assert_eq!(simulated.fee_in_input, 25);
        // floor(39_505 * 9_950 / 10_000)
        assert_eq!(simulated.minimum_amount_out, 39_307);
        assert_eq!(simulated.price_impact.ppm(), 12_375);
    }

    #[test]
    fn test_two_hops_compose() {
        let (a, b, c) = (make_token(), make_token(), make_token());
        let first = make_amm_pool(a, b, 1_000_000, 4_000_000, 25);
        let second = make_amm_pool(b, c, 8_000_000, 2_000_000, 30);
        let snapshot = make_snapshot(vec![first.clone(), second.clone()]);
        let path = only_path(&snapshot, &a, &c);

        let simulated = evaluate(&snapshot, &path, 10_000, 100, 0).unwrap();
        assert_eq!(simulated.hop_count(), 2);
        assert_eq!(simulated.hops[0].amount_out, 39_505);
        assert_eq!(simulated.hops[1].amount_in, 39_505);

        // each hop matches its pool simulated on its own
        let alone = second.simulate_swap(None, &b.mint, 39_505, 0).unwrap();
        assert_eq!(simulated.amount_out, alone.amount_out);

        // no value created: both invariants grow
        for (pool, hop) in [(&first, &simulated.hops[0]), (&second, &simulated.hops[1])] {
            let PoolState::ConstantProduct(p) = pool else { unreachable!() };
            let (r_in, r_out) = if hop.token_in == p.mint_a {
                (p.reserve_a, p.reserve_b)
            } else {
                (p.reserve_b, p.reserve_a)
            };
            let before = u128::from(r_in) * u128::from(r_out);
            let after = u128::from(r_in + hop.amount_in) * u128::from(r_out - hop.amount_out);
            assert!(after >= before);
        }

        // fee of hop two (in B) reported in A through hop one's price of 4
        let second_fee_in_a = simulated.hops[1].fee_amount / 4;
        assert_eq!(simulated.fee_in_input, 25 + second_fee_in_a);
        assert!(simulated.minimum_amount_out <= simulated.amount_out);
    }

    #[test]
    fn test_minimums_chain_through_guaranteed_amounts() {
        let (a, b, c) = (make_token(), make_token(), make_token());
        let snapshot = make_snapshot(vec![
            make_amm_pool(a, b, 1_000_000, 4_000_000, 25),
            make_amm_pool(b, c, 8_000_000, 2_000_000, 30),
        ]);
        let path = only_path(&snapshot, &a, &c);

        let simulated = evaluate(&snapshot, &path, 10_000, 100, 0).unwrap();
        let (first, second) = (&simulated.hops[0], &simulated.hops[1]);
        assert_eq!((first.guaranteed_in, first.minimum_amount_out), (10_000, 39_109));

        // simulated on 39_505 of B, but only 39_109 is certain to arrive
        assert_eq!(second.amount_out, 9_798);
        assert_eq!(second.guaranteed_in, 39_109);
        // 39_109 of B gives 9_700 of C, less 1%
        assert_eq!(second.minimum_amount_out, 9_603);
        assert_eq!(simulated.minimum_amount_out, 9_603);

        let exact = evaluate(&snapshot, &path, 10_000, 0, 0).unwrap();
        assert_eq!(exact.hops[1].guaranteed_in, exact.hops[0].amount_out);
        assert_eq!(exact.minimum_amount_out, exact.amount_out);
    }

    #[test]
    fn test_full_slippage_guarantees_nothing() {
        let (a, b, c) = (make_token(), make_token(), make_token());
        let snapshot = make_snapshot(vec![
            make_amm_pool(a, b, 1_000_000, 4_000_000, 25),
            make_amm_pool(b, c, 8_000_000, 2_000_000, 30),
        ]);
        let path = only_path(&snapshot, &a, &c);

        let simulated = evaluate(&snapshot, &path, 10_000, 10_000, 0).unwrap();
        assert_eq!(simulated.hops[1].guaranteed_in, 0);
        assert_eq!(simulated.minimum_amount_out, 0);
        assert_eq!(simulated.amount_out, 9_798);
    }

    #[test]
    fn test_mixed_pool_kinds() {
        let (a, b, c) = (make_token(), make_token(), make_token());
        let snapshot = make_snapshot(vec![
            make_clmm_pool(a, b),
            make_amm_pool(b, c, 1_000_000_000, 1_000_000_000, 25),
        ]);
        let path = only_path(&snapshot, &a, &c);

        let simulated = evaluate(&snapshot, &path, 1_000_000, 0, 0).unwrap();
        assert_eq!(simulated.hops[0].amount_out, 997_499);
        assert_eq!(simulated.hops[0].tick_arrays, vec![0, -600]);
        assert_eq!(simulated.minimum_amount_out, simulated.amount_out);
        assert!(simulated.hops[1].tick_arrays.is_empty());
    }

    #[test]
    fn test_failing_hop_fails_path() {
        let (a, b, c) = (make_token(), make_token(), make_token());
        let clmm = make_clmm_pool(b, c);
        let snapshot = PoolSnapshot::new(
            vec![make_amm_pool(a, b, 1_000_000, 1_000_000, 25), clmm.clone()],
            HashMap::new(),
            0,
        );
        let path = only_path(&snapshot, &a, &c);

        let err = evaluate(&snapshot, &path, 10_000, 50, 0).unwrap_err();
        assert_eq!(
            err,
            RoutingError::HopFailed {
                hop: 1,
                pool: clmm.id(),
                source: SimulationError::TickDataMissing {
                    pool: clmm.id(),
                    start_index: 0
                },
            }
        );
        assert_eq!(err.error_code(), "tick_data_missing");
    }

    #[test]
    fn test_insufficient_liquidity_hop() {
        let (a, b) = (make_token(), make_token());
        let pool = make_amm_pool(a, b, 1_000_000, 1, 25);
        let snapshot = make_snapshot(vec![pool.clone()]);
        let path = only_path(&snapshot, &a, &b);

        let err = evaluate(&snapshot, &path, 10, 50, 0).unwrap_err();
        assert!(matches!(err, RoutingError::HopFailed { hop: 0, .. }));
        assert_eq!(err.error_code(), "insufficient_liquidity");
    }
}
