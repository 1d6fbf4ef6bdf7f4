//! Pool Graph & Path Finding
//!
//! Tokens are nodes and every routable pool contributes one directed edge
//! per swap direction. Candidate paths come out of a bounded depth-first
//! search that never revisits a token or reuses a pool.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use router_core::Token;

use crate::pool::{PoolKind, PoolState};

/// Directed traversal of one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Position of the pool in the snapshot it was built from
    pub pool_index: usize,
    pub pool_id: Pubkey,
    pub kind: PoolKind,
    pub token_in: Token,
    pub token_out: Token,
}

/// Adjacency-list pool graph keyed by mint
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    pub adjacency: HashMap<Pubkey, Vec<Edge>>,
    pub pool_count: usize,
}

/// Ordered edges leading from the request input to its output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePath {
    pub edges: Vec<Edge>,
}

impl CandidatePath {
    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    pub fn pool_ids(&self) -> impl Iterator<Item = Pubkey> + '_ {
        self.edges.iter().map(|edge| edge.pool_id)
    }

    /// True when the two paths route through no common pool
    pub fn is_disjoint(&self, other: &CandidatePath) -> bool {
        let pools: HashSet<Pubkey> = self.pool_ids().collect();
        other.pool_ids().all(|id| !pools.contains(&id))
    }
}

impl PoolGraph {
    pub fn edges_from(&self, mint: &Pubkey) -> &[Edge] {
        self.adjacency.get(mint).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Build the pool graph for a routing request at chain time `now`.
///
/// Pools that have not opened, hold no liquidity, or trade a mint their
/// program cannot move are left out. Edges keep the order of `pools`.
pub fn build_pool_graph(pools: &[PoolState], now: i64) -> PoolGraph {
    let mut adjacency: HashMap<Pubkey, Vec<Edge>> = HashMap::new();
    let mut pool_count = 0;

    for (pool_index, pool) in pools.iter().enumerate() {
        if !pool.is_active(now) {
            debug!(pool = %pool.id(), "skipping pool before open time");
            continue;
        }
        if !pool.has_liquidity() {
            debug!(pool = %pool.id(), "skipping empty pool");
            continue;
        }
        if !pool.supports_tokens() {
            warn!(pool = %pool.id(), "skipping constant-product pool with Token-2022 mint");
            continue;
        }

        let (token_a, token_b) = pool.tokens();
        if token_a.mint == token_b.mint {
            continue;
        }

        for (token_in, token_out) in [(token_a, token_b), (token_b, token_a)] {
            adjacency.entry(token_in.mint).or_default().push(Edge {
                pool_index,
                pool_id: pool.id(),
                kind: pool.kind(),
                token_in,
                token_out,
            });
        }
        pool_count += 1;
    }

    PoolGraph {
        adjacency,
        pool_count,
    }
}

/// Every path from `input` to `output` of at most `max_hops` edges.
///
/// Paths come back in ascending hop count, then in discovery order. An
/// empty result means no route exists.
pub fn enumerate_routes(
    graph: &PoolGraph,
    input: &Pubkey,
    output: &Pubkey,
    max_hops: usize,
) -> Vec<CandidatePath> {
    let mut results = Vec::new();
    if input == output || max_hops == 0 {
        return results;
    }

    let mut path = Vec::new();
    let mut visited = HashSet::from([*input]);
    let mut used_pools = HashSet::new();
    search(
        graph,
        input,
        output,
        max_hops,
        &mut path,
        &mut visited,
        &mut used_pools,
        &mut results,
    );

    // stable: equal lengths keep discovery order
    results.sort_by_key(CandidatePath::hops);
    debug!(
        input = %input,
        output = %output,
        candidates = results.len(),
        "enumerated candidate paths"
    );
    results
}

#[allow(clippy::too_many_arguments)]
fn search(
    graph: &PoolGraph,
    current: &Pubkey,
    target: &Pubkey,
    max_hops: usize,
    path: &mut Vec<Edge>,
    visited: &mut HashSet<Pubkey>,
    used_pools: &mut HashSet<Pubkey>,
    results: &mut Vec<CandidatePath>,
) {
    for edge in graph.edges_from(current) {
        if used_pools.contains(&edge.pool_id) {
            continue;
        }
        let next = edge.token_out.mint;

        if next == *target {
            let mut edges = path.clone();
            edges.push(*edge);
            results.push(CandidatePath { edges });
        } else if path.len() + 1 < max_hops && !visited.contains(&next) {
            path.push(*edge);
            visited.insert(next);
            used_pools.insert(edge.pool_id);

            search(graph, &next, target, max_hops, path, visited, used_pools, results);

            used_pools.remove(&edge.pool_id);
            visited.remove(&next);
            path.pop();
        }
    }
}
