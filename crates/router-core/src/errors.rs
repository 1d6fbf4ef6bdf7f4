//! Error types for the swap router

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Top-level error wrapping every failure family of the router
#[derive(Debug, Error)]
pub enum Error {
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures of a single-hop curve simulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("Insufficient liquidity in pool {pool}")]
    InsufficientLiquidity { pool: Pubkey },

    #[error("Pool {pool} opens at {open_time} (chain time {now})")]
    PoolInactive {
        pool: Pubkey,
        open_time: i64,
        now: i64,
    },

    #[error("Tick array {start_index} not loaded for pool {pool}")]
    TickDataMissing { pool: Pubkey, start_index: i32 },

    #[error("Mint {mint} is not traded by pool {pool}")]
    InvalidToken { pool: Pubkey, mint: Pubkey },

    #[error("Arithmetic overflow simulating pool {pool}")]
    MathOverflow { pool: Pubkey },
}

/// Route discovery, evaluation and selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("No route from {input_mint} to {output_mint}")]
    NoRouteFound {
        input_mint: Pubkey,
        output_mint: Pubkey,
    },

    #[error("Hop {hop} through pool {pool} failed: {source}")]
    HopFailed {
        hop: usize,
        pool: Pubkey,
        #[source]
        source: SimulationError,
    },

    #[error("Snapshot fetched at {fetched_at} is older than {max_age_secs}s (now {now})")]
    StaleSnapshot {
        fetched_at: i64,
        now: i64,
        max_age_secs: u64,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Instruction building and transaction packing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Signer {account} is missing from the wallet context")]
    MissingOwnerAccount { account: Pubkey },

    #[error(
        "Instruction {index} does not fit a transaction alone \
         ({size}/{max_size} bytes, {accounts}/{max_accounts} accounts)"
    )]
    InstructionTooLarge {
        index: usize,
        size: usize,
        max_size: usize,
        accounts: usize,
        max_accounts: usize,
    },

    #[error("Route has no swap paths")]
    EmptyRoute,

    #[error("Failed to build instruction: {message}")]
    Instruction { message: String },

    #[error("Failed to compile message: {message}")]
    Compile { message: String },
}

/// Errors reported by external collaborators (pool store, submitter)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Pool source unavailable: {message}")]
    Unavailable { message: String },

    #[error("Submission failed: {message}")]
    Submission { message: String },
}

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, Error>;

impl SimulationError {
    /// Pool the failure originated in
    pub fn pool(&self) -> &Pubkey {
        match self {
            Self::InsufficientLiquidity { pool }
            | Self::PoolInactive { pool, .. }
            | Self::TickDataMissing { pool, .. }
            | Self::InvalidToken { pool, .. }
            | Self::MathOverflow { pool } => pool,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLiquidity { .. } => "insufficient_liquidity",
            Self::PoolInactive { .. } => "pool_inactive",
            Self::TickDataMissing { .. } => "tick_data_missing",
            Self::InvalidToken { .. } => "invalid_token",
            Self::MathOverflow { .. } => "math_overflow",
        }
    }
}

impl RoutingError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoRouteFound { .. } => "no_route_found",
            Self::HopFailed { source, .. } => source.error_code(),
            Self::StaleSnapshot { .. } => "stale_snapshot",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }

    /// Wrap a simulation failure with the hop it happened on
    pub fn hop(hop: usize, source: SimulationError) -> Self {
        Self::HopFailed {
            hop,
            pool: *source.pool(),
            source,
        }
    }
}

impl BuildError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingOwnerAccount { .. } => "missing_owner_account",
            Self::InstructionTooLarge { .. } => "instruction_too_large",
            Self::EmptyRoute => "empty_route",
            Self::Instruction { .. } => "instruction_failed",
            Self::Compile { .. } => "compile_failed",
        }
    }
}
