//! Swap Instruction Builder
//!
//! Encodes the v4 `SwapBaseIn` instruction.
//!
//! # Instruction Layout
//!
//! Data:     [tag = 9, amount_in: u64 LE, minimum_amount_out: u64 LE]
//! Accounts: token program, pool, authority, open orders, target orders,
//!           pool vaults (a, b), market program, market, bids, asks,
//!           event queue, market vaults (a, b), market authority,
//!           user source, user destination, user owner (signer)
//!
//! Direction is implied by which user token account is the source.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use router_core::BuildError;

use crate::constants::instructions::SWAP_BASE_IN;
use crate::state::AmmPool;

/// User-side accounts of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSwapAccounts {
    pub owner: Pubkey,
    /// Token account debited with the input
    pub source: Pubkey,
    /// Token account credited with the output
    pub destination: Pubkey,
}

#[derive(BorshSerialize)]
struct SwapBaseInData {
    instruction: u8,
    amount_in: u64,
    minimum_amount_out: u64,
}

/// Encode `SwapBaseIn` payload bytes
pub fn swap_base_in_data(amount_in: u64, minimum_amount_out: u64) -> Result<Vec<u8>, BuildError> {
    SwapBaseInData {
        instruction: SWAP_BASE_IN,
        amount_in,
        minimum_amount_out,
    }
    .try_to_vec()
    .map_err(|e| BuildError::Instruction {
        message: format!("failed to encode swap_base_in: {e}"),
    })
}

/// Build an exact-input swap instruction for a constant-product pool
pub fn build_swap_instruction(
    pool: &AmmPool,
    user: &UserSwapAccounts,
    amount_in: u64,
    minimum_amount_out: u64,
) -> Result<Instruction, BuildError> {
    let keys = &pool.keys;
    let accounts = vec![
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new(pool.id, false),
        AccountMeta::new_readonly(keys.authority, false),
        AccountMeta::new(keys.open_orders, false),
        AccountMeta::new(keys.target_orders, false),
        AccountMeta::new(keys.vault_a, false),
        AccountMeta::new(keys.vault_b, false),
        AccountMeta::new_readonly(keys.market_program_id, false),
        AccountMeta::new(keys.market_id, false),
        AccountMeta::new(keys.market_bids, false),
        AccountMeta::new(keys.market_asks, false),
        AccountMeta::new(keys.market_event_queue, false),
        AccountMeta::new(keys.market_vault_a, false),
        AccountMeta::new(keys.market_vault_b, false),
        AccountMeta::new_readonly(keys.market_authority, false),
        AccountMeta::new(user.source, false),
        AccountMeta::new(user.destination, false),
        AccountMeta::new_readonly(user.owner, true),
    ];

    Ok(Instruction {
        program_id: pool.program_id,
        accounts,
        data: swap_base_in_data(amount_in, minimum_amount_out)?,
    })
}
