//! Native SOL wrapping
//!
//! SOL enters a swap as wrapped SOL held in the owner's associated token
//! account for the native mint and leaves it through `close_account`.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;

use router_core::BuildError;

/// Fund `wsol_account` with `lamports` and resync its token balance
pub fn wrap_native_instructions(
    owner: &Pubkey,
    wsol_account: &Pubkey,
    lamports: u64,
) -> Result<Vec<Instruction>, BuildError> {
    let sync = spl_token::instruction::sync_native(&spl_token::id(), wsol_account).map_err(|e| {
        BuildError::Instruction {
            message: format!("sync_native: {e}"),
        }
    })?;
    Ok(vec![
        system_instruction::transfer(owner, wsol_account, lamports),
        sync,
    ])
}

/// Close the wrapped SOL account, returning every lamport to the owner
pub fn unwrap_native_instruction(
    owner: &Pubkey,
    wsol_account: &Pubkey,
) -> Result<Instruction, BuildError> {
    spl_token::instruction::close_account(&spl_token::id(), wsol_account, owner, owner, &[])
        .map_err(|e| BuildError::Instruction {
            message: format!("close_account: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_program;

    #[test]
    fn test_wrap_transfers_then_syncs() {
        let owner = Pubkey::new_unique();
        let wsol = Pubkey::new_unique();
        let ixs = wrap_native_instructions(&owner, &wsol, 1_000_000).unwrap();
        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, system_program::id());
        assert_eq!(ixs[0].accounts[1].pubkey, wsol);
        assert_eq!(ixs[1].program_id, spl_token::id());
        assert_eq!(ixs[1].accounts[0].pubkey, wsol);
    }

    #[test]
    fn test_unwrap_returns_to_owner() {
        let owner = Pubkey::new_unique();
        let wsol = Pubkey::new_unique();
        let ix = unwrap_native_instruction(&owner, &wsol).unwrap();
        assert_eq!(ix.program_id, spl_token::id());
        assert_eq!(ix.accounts[0].pubkey, wsol);
        assert_eq!(ix.accounts[1].pubkey, owner);
        assert!(ix.accounts[2].is_signer);
    }
}
