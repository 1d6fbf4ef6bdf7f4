//! solana-tx: Instruction and transaction building utilities for Solana
//!
//! Provides token-account resolution, native SOL wrapping, compute budget
//! instructions and size-bounded packing into versioned transactions.

pub mod accounts;
pub mod compute_budget;
pub mod native;
pub mod packer;

pub use accounts::{
    associated_token_address, create_associated_token_account, fee_transfer_instruction,
    ResolvedAccount, WalletContext,
};
pub use compute_budget::compute_budget_instructions;
pub use native::{unwrap_native_instruction, wrap_native_instructions};
pub use packer::{
    measure, order_dependencies, pack, InstructionKind, PlannedInstruction, TransactionBundle,
};
