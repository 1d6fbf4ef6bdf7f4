//! Configuration types for the swap router

use serde::{Deserialize, Serialize};

/// Legacy/v0 transaction packet ceiling in bytes
pub const PACKET_DATA_SIZE: usize = 1232;

/// Account-lock ceiling per transaction
pub const MAX_TX_ACCOUNTS: usize = 64;

/// How the selector turns simulated paths into a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Best single path by output
    #[default]
    SingleBest,
    /// Greedy incremental allocation across pool-disjoint paths
    Split {
        #[serde(default = "default_split_paths")]
        max_paths: usize,
        #[serde(default = "default_split_steps")]
        steps: u32,
    },
}

fn default_split_paths() -> usize {
    3
}

fn default_split_steps() -> u32 {
    20
}

/// Per-transaction ceilings used by the packer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingConfig {
    #[serde(default = "default_max_transaction_bytes")]
    pub max_transaction_bytes: usize,

    #[serde(default = "default_max_accounts")]
    pub max_accounts: usize,
}

fn default_max_transaction_bytes() -> usize {
    PACKET_DATA_SIZE
}

fn default_max_accounts() -> usize {
    MAX_TX_ACCOUNTS
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            max_transaction_bytes: default_max_transaction_bytes(),
            max_accounts: default_max_accounts(),
        }
    }
}

/// Compute budget instructions prepended to each transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeBudgetConfig {
    pub units: u32,
    pub micro_lamports: u64,
}

impl Default for ComputeBudgetConfig {
    fn default() -> Self {
        Self {
            units: 400_000,
            micro_lamports: 1,
        }
    }
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Hop bound used when a request does not carry its own
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default)]
    pub selection: SelectionPolicy,

    /// Oldest snapshot accepted by `compute_route`; `None` disables the check
    #[serde(default = "default_snapshot_max_age")]
    pub snapshot_max_age_secs: Option<u64>,

    #[serde(default)]
    pub packing: PackingConfig,

    #[serde(default = "default_compute_budget")]
    pub compute_budget: Option<ComputeBudgetConfig>,

    /// Wrap/unwrap native SOL around the swap
    #[serde(default = "default_wrap_native")]
    pub wrap_native: bool,
}

fn default_max_hops() -> usize {
    3
}

fn default_snapshot_max_age() -> Option<u64> {
    Some(30)
}

fn default_compute_budget() -> Option<ComputeBudgetConfig> {
    Some(ComputeBudgetConfig::default())
}

fn default_wrap_native() -> bool {
    true
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            selection: SelectionPolicy::default(),
            snapshot_max_age_secs: default_snapshot_max_age(),
            packing: PackingConfig::default(),
            compute_budget: default_compute_budget(),
            wrap_native: default_wrap_native(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.max_hops, 3);
        assert_eq!(config.selection, SelectionPolicy::SingleBest);
        assert_eq!(config.packing.max_transaction_bytes, 1232);
        assert_eq!(config.packing.max_accounts, 64);
        assert_eq!(config.compute_budget.unwrap().units, 400_000);
        assert!(config.wrap_native);
    }

    #[test]
    fn test_config_serialization() {
        let config = RouterConfig {
            selection: SelectionPolicy::Split {
                max_paths: 2,
                steps: 10,
            },
            compute_budget: None,
            ..RouterConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RouterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config() {
        let parsed: RouterConfig =
            serde_json::from_str(r#"{"max_hops":2,"selection":{"type":"split"}}"#).unwrap();
        assert_eq!(parsed.max_hops, 2);
        assert_eq!(
            parsed.selection,
            SelectionPolicy::Split {
                max_paths: 3,
                steps: 20
            }
        );
        assert_eq!(parsed.snapshot_max_age_secs, Some(30));
        assert!(parsed.compute_budget.is_some());
    }
}
