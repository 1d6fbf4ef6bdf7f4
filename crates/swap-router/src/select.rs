//! Route Selector
//!
//! Picks the best simulated path, or spreads the input greedily across
//! pool-disjoint paths when split routing is enabled.

use solana_sdk::pubkey::Pubkey;
use std::cmp::Ordering;
use tracing::debug;

use router_core::{FeeConfig, PriceImpact, RoutingError, Token};

use crate::evaluate::{evaluate, SimulatedPath};
use crate::snapshot::PoolSnapshot;

/// Integrator fee taken from the input before routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCharge {
    pub config: FeeConfig,
    pub amount: u64,
}

/// Selected paths that together consume the routed input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub input: Token,
    pub output: Token,
    /// Swapped amount, integrator fee excluded
    pub amount_in: u64,
    pub amount_out: u64,
    /// Sum of the paths' minimums
    pub minimum_amount_out: u64,
    /// Input-weighted over the paths
    pub price_impact: PriceImpact,
    pub slippage_bps: u16,
    pub paths: Vec<SimulatedPath>,
    pub fee: Option<FeeCharge>,
}

impl Route {
    pub fn new(
        input: Token,
        output: Token,
        slippage_bps: u16,
        paths: Vec<SimulatedPath>,
        fee: Option<FeeCharge>,
    ) -> Self {
        let amount_in = paths.iter().map(|p| p.amount_in).sum();
        let amount_out = paths.iter().map(|p| p.amount_out).sum();
        let minimum_amount_out = paths.iter().map(|p| p.minimum_amount_out).sum();
        Self {
            input,
            output,
            amount_in,
            amount_out,
            minimum_amount_out,
            price_impact: weighted_impact(&paths),
            slippage_bps,
            paths,
            fee,
        }
    }

    pub fn is_split(&self) -> bool {
        self.paths.len() > 1
    }

    /// Input spent in total, integrator fee included
    pub fn total_input(&self) -> u64 {
        self.amount_in + self.fee.map_or(0, |fee| fee.amount)
    }
}

fn weighted_impact(paths: &[SimulatedPath]) -> PriceImpact {
    let total: u128 = paths.iter().map(|p| u128::from(p.amount_in)).sum();
    if total == 0 {
        return PriceImpact::ZERO;
    }
    let weighted: u128 = paths
        .iter()
        .map(|p| u128::from(p.price_impact.ppm()) * u128::from(p.amount_in))
        .sum();
    PriceImpact(u64::try_from(weighted / total).unwrap_or(u64::MAX))
}

/// Higher output first, then fewer hops; equal paths keep their order
fn compare(a: &SimulatedPath, b: &SimulatedPath) -> Ordering {
    b.amount_out
        .cmp(&a.amount_out)
        .then(a.hop_count().cmp(&b.hop_count()))
}

/// Successful candidates best first, ties in discovery order
pub fn rank(evaluated: &[Result<SimulatedPath, RoutingError>]) -> Vec<&SimulatedPath> {
    let mut ranked: Vec<&SimulatedPath> = evaluated.iter().filter_map(|r| r.as_ref().ok()).collect();
    ranked.sort_by(|a, b| compare(a, b));
    ranked
}

/// Best candidate by output, then hop count, then discovery order.
///
/// With no candidates at all the result is `NoRouteFound`; when every
/// candidate failed, the first candidate's failure is returned.
pub fn select_best(
    evaluated: &[Result<SimulatedPath, RoutingError>],
    input_mint: &Pubkey,
    output_mint: &Pubkey,
) -> Result<SimulatedPath, RoutingError> {
    if let Some(best) = rank(evaluated).first() {
        return Ok((*best).clone());
    }
    match evaluated.iter().find_map(|r| r.as_ref().err()) {
        Some(err) => Err(err.clone()),
        None => Err(RoutingError::NoRouteFound {
            input_mint: *input_mint,
            output_mint: *output_mint,
        }),
    }
}

/// Greedy split of the input across up to `max_paths` pool-disjoint paths.
///
/// The input is cut into `steps` chunks (the remainder rides on the last)
/// and each chunk goes to the path whose output grows the most from it,
/// ties to the better-ranked path. Returns `None` when fewer than two paths
/// end up used or the split does not beat the best single path.
pub fn select_split(
    snapshot: &PoolSnapshot,
    evaluated: &[Result<SimulatedPath, RoutingError>],
    max_paths: usize,
    steps: u32,
    slippage_bps: u16,
    now: i64,
) -> Option<Vec<SimulatedPath>> {
    let ranked = rank(evaluated);
    let best = *ranked.first()?;

    let mut chosen: Vec<&SimulatedPath> = Vec::new();
    for candidate in ranked {
        if chosen.len() == max_paths {
            break;
        }
        if chosen.iter().all(|c| c.path.is_disjoint(&candidate.path)) {
            chosen.push(candidate);
        }
    }
    if chosen.len() < 2 || steps < 2 {
        return None;
    }

    let total = best.amount_in;
    let steps = u64::from(steps);
    let chunk = total / steps;
    if chunk == 0 {
        return None;
    }

    let mut allocated = vec![0u64; chosen.len()];
    let mut current: Vec<Option<SimulatedPath>> = vec![None; chosen.len()];
    for step in 0..steps {
        let size = if step + 1 == steps {
            total - chunk * (steps - 1)
        } else {
            chunk
        };

        let mut pick: Option<(usize, u64, SimulatedPath)> = None;
        for (index, candidate) in chosen.iter().enumerate() {
            let Ok(next) = evaluate(snapshot, &candidate.path, allocated[index] + size, slippage_bps, now) else {
                continue;
            };
            let before = current[index].as_ref().map_or(0, |p| p.amount_out);
            let gain = next.amount_out.saturating_sub(before);
            if pick.as_ref().map_or(true, |(_, best_gain, _)| gain > *best_gain) {
                pick = Some((index, gain, next));
            }
        }

        let (index, _, next) = pick?;
        allocated[index] += size;
        current[index] = Some(next);
    }

    let paths: Vec<SimulatedPath> = current.into_iter().flatten().collect();
    let split_out: u64 = paths.iter().map(|p| p.amount_out).sum();
    debug!(
        paths = paths.len(),
        split_out,
        single_out = best.amount_out,
        "evaluated split allocation"
    );
    if paths.len() < 2 || split_out <= best.amount_out {
        return None;
    }
    Some(paths)
}
