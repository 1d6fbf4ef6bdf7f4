//! Swap Instruction Builder
//!
//! Encodes the CLMM `swap_v2` instruction and derives the tick-array
//! accounts it walks.
//!
//! # Instruction Layout
//!
//! Data:     [discriminator(8), amount: u64, other_amount_threshold: u64,
//!            sqrt_price_limit_x64: u128, is_base_input: bool]
//! Accounts: payer (signer), amm config, pool, input/output token accounts,
//!           input/output vaults, observation, token program, token-2022
//!           program, memo program, input/output mints, then tick arrays.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use router_core::BuildError;

use crate::calculator::sqrt_price_limit;
use crate::constants::instructions::SWAP_V2_DISCRIMINATOR;
use crate::constants::ticks::TICK_ARRAY_SEED;
use crate::constants::MEMO_PROGRAM_ID;
use crate::state::ClmmPool;

/// User-side accounts of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSwapAccounts {
    pub owner: Pubkey,
    pub source: Pubkey,
    pub destination: Pubkey,
}

#[derive(BorshSerialize)]
struct SwapV2Args {
    amount: u64,
    other_amount_threshold: u64,
    sqrt_price_limit_x64: u128,
    is_base_input: bool,
}

/// Tick array account address for `start_index`
pub fn tick_array_address(program_id: &Pubkey, pool_id: &Pubkey, start_index: i32) -> Pubkey {
    Pubkey::find_program_address(
        &[TICK_ARRAY_SEED, pool_id.as_ref(), &start_index.to_be_bytes()],
        program_id,
    )
    .0
}

/// Encode exact-input `swap_v2` payload bytes
pub fn swap_v2_data(
    amount_in: u64,
    minimum_amount_out: u64,
    sqrt_price_limit_x64: u128,
) -> Result<Vec<u8>, BuildError> {
    let args = SwapV2Args {
        amount: amount_in,
        other_amount_threshold: minimum_amount_out,
        sqrt_price_limit_x64,
        is_base_input: true,
    };
    let mut data = Vec::with_capacity(8 + 41);
    data.extend_from_slice(&SWAP_V2_DISCRIMINATOR);
    args.serialize(&mut data).map_err(|e| BuildError::Instruction {
        message: format!("failed to encode swap_v2: {e}"),
    })?;
    Ok(data)
}

/// Build an exact-input swap through a CLMM pool.
///
/// `tick_arrays` are start indices in traversal order, as reported by the
/// simulator.
pub fn build_swap_instruction(
    pool: &ClmmPool,
    user: &UserSwapAccounts,
    a_to_b: bool,
    amount_in: u64,
    minimum_amount_out: u64,
    tick_arrays: &[i32],
) -> Result<Instruction, BuildError> {
    let (input_vault, output_vault, input_mint, output_mint) = if a_to_b {
        (pool.vault_a, pool.vault_b, pool.mint_a.mint, pool.mint_b.mint)
    } else {
        (pool.vault_b, pool.vault_a, pool.mint_b.mint, pool.mint_a.mint)
    };

    let mut accounts = vec![
        AccountMeta::new_readonly(user.owner, true),
        AccountMeta::new_readonly(pool.amm_config, false),
        AccountMeta::new(pool.id, false),
        AccountMeta::new(user.source, false),
        AccountMeta::new(user.destination, false),
        AccountMeta::new(input_vault, false),
        AccountMeta::new(output_vault, false),
        AccountMeta::new(pool.observation, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(spl_token_2022::id(), false),
        AccountMeta::new_readonly(MEMO_PROGRAM_ID, false),
        AccountMeta::new_readonly(input_mint, false),
        AccountMeta::new_readonly(output_mint, false),
    ];
    accounts.extend(tick_arrays.iter().map(|start| {
        AccountMeta::new(tick_array_address(&pool.program_id, &pool.id, *start), false)
    }));

    Ok(Instruction {
        program_id: pool.program_id,
        accounts,
        data: swap_v2_data(amount_in, minimum_amount_out, sqrt_price_limit(a_to_b))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::instructions::SWAP_V2_FIXED_ACCOUNTS;
    use crate::test_utils::make_pool;

    #[test]
    fn test_swap_v2_data_layout() {
        let data = swap_v2_data(1_000, 990, 4_295_048_017).unwrap();
        assert_eq!(data.len(), 8 + 8 + 8 + 16 + 1);
        assert_eq!(&data[..8], &SWAP_V2_DISCRIMINATOR);
        assert_eq!(&data[8..16], &1_000u64.to_le_bytes());
        assert_eq!(&data[16..24], &990u64.to_le_bytes());
        assert_eq!(&data[24..40], &4_295_048_017u128.to_le_bytes());
        assert_eq!(data[40], 1);
    }

    #[test]
    fn test_tick_array_address_is_deterministic() {
        let pool = make_pool();
        let a = tick_array_address(&pool.program_id, &pool.id, -600);
        assert_eq!(a, tick_array_address(&pool.program_id, &pool.id, -600));
        assert_ne!(a, tick_array_address(&pool.program_id, &pool.id, 0));
        let (expected, _) = Pubkey::find_program_address(
            &[b"tick_array", pool.id.as_ref(), &(-600i32).to_be_bytes()],
            &pool.program_id,
        );
        assert_eq!(a, expected);
    }

    #[test]
    fn test_swap_instruction_direction() {
        let pool = make_pool();
        let user = UserSwapAccounts {
            owner: Pubkey::new_unique(),
            source: Pubkey::new_unique(),
            destination: Pubkey::new_unique(),
        };

        let ix = build_swap_instruction(&pool, &user, true, 500, 450, &[0, -600]).unwrap();
        assert_eq!(ix.accounts.len(), SWAP_V2_FIXED_ACCOUNTS + 2);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[5].pubkey, pool.vault_a);
        assert_eq!(ix.accounts[6].pubkey, pool.vault_b);
        assert_eq!(ix.accounts[11].pubkey, pool.mint_a.mint);
        assert_eq!(
            ix.accounts[14].pubkey,
            tick_array_address(&pool.program_id, &pool.id, -600)
        );
        assert!(ix.accounts[13..].iter().all(|meta| meta.is_writable));
        assert_eq!(&ix.data[24..40], &sqrt_price_limit(true).to_le_bytes());

        let ix = build_swap_instruction(&pool, &user, false, 500, 450, &[0]).unwrap();
        assert_eq!(ix.accounts[5].pubkey, pool.vault_b);
        assert_eq!(ix.accounts[12].pubkey, pool.mint_a.mint);
        assert_eq!(&ix.data[24..40], &sqrt_price_limit(false).to_le_bytes());
    }
}
