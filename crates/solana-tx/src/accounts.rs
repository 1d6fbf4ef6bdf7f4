//! Token account resolution
//!
//! Maps mints to the owner's token accounts, deriving associated token
//! accounts for anything the wallet does not already hold.

use std::collections::HashMap;

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use router_core::{BuildError, Token};

/// Keys and token accounts the caller controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletContext {
    pub owner: Pubkey,
    /// Keys the caller can sign with
    pub signers: Vec<Pubkey>,
    /// Existing token accounts by mint
    pub token_accounts: HashMap<Pubkey, Pubkey>,
}

/// Token account to use for a mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub address: Pubkey,
    /// False when the account has to be created first
    pub exists: bool,
}

impl WalletContext {
    /// Wallet that signs as its owner
    pub fn new(owner: Pubkey) -> Self {
        Self {
            owner,
            signers: vec![owner],
            token_accounts: HashMap::new(),
        }
    }

    /// Wallet known only by address; nothing can be signed
    pub fn watch_only(owner: Pubkey) -> Self {
        Self {
            owner,
            signers: Vec::new(),
            token_accounts: HashMap::new(),
        }
    }

    pub fn with_token_account(mut self, mint: Pubkey, account: Pubkey) -> Self {
        self.token_accounts.insert(mint, account);
        self
    }

    pub fn require_signer(&self, key: &Pubkey) -> Result<(), BuildError> {
        if self.signers.contains(key) {
            Ok(())
        } else {
            Err(BuildError::MissingOwnerAccount { account: *key })
        }
    }

    /// Account holding `token` for the owner, derived when unknown
    pub fn resolve(&self, token: &Token) -> ResolvedAccount {
        match self.token_accounts.get(&token.mint) {
            Some(address) => ResolvedAccount {
                address: *address,
                exists: true,
            },
            None => ResolvedAccount {
                address: associated_token_address(&self.owner, token),
                exists: false,
            },
        }
    }
}

/// Associated token account of `owner` for `token` under its token program
pub fn associated_token_address(owner: &Pubkey, token: &Token) -> Pubkey {
    get_associated_token_address_with_program_id(owner, &token.mint, &token.program.id())
}

/// Idempotent creation of the owner's associated token account
pub fn create_associated_token_account(payer: &Pubkey, owner: &Pubkey, token: &Token) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, &token.mint, &token.program.id())
}

/// `transfer_checked` of `amount` from the owner's account to a fee account
pub fn fee_transfer_instruction(
    token: &Token,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, BuildError> {
    spl_token_2022::instruction::transfer_checked(
        &token.program.id(),
        source,
        &token.mint,
        destination,
        owner,
        &[],
        amount,
        token.decimals,
    )
    .map_err(|e| BuildError::Instruction {
        message: format!("fee transfer: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_core::TokenProgram;

    #[test]
    fn test_resolve_prefers_known_account() {
        let owner = Pubkey::new_unique();
        let token = Token::new(Pubkey::new_unique(), 6, TokenProgram::Spl);
        let held = Pubkey::new_unique();
        let wallet = WalletContext::new(owner).with_token_account(token.mint, held);
        assert_eq!(
            wallet.resolve(&token),
            ResolvedAccount {
                address: held,
                exists: true
            }
        );
    }

    #[test]
    fn test_resolve_derives_ata_per_program() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let wallet = WalletContext::new(owner);

        let spl = wallet.resolve(&Token::new(mint, 6, TokenProgram::Spl));
        let t22 = wallet.resolve(&Token::new(mint, 6, TokenProgram::Token2022));
        assert!(!spl.exists);
        assert_ne!(spl.address, t22.address);
        assert_eq!(
            spl.address,
            get_associated_token_address_with_program_id(&owner, &mint, &spl_token::id())
        );
    }

    #[test]
    fn test_require_signer() {
        let owner = Pubkey::new_unique();
        assert!(WalletContext::new(owner).require_signer(&owner).is_ok());
        assert_eq!(
            WalletContext::watch_only(owner).require_signer(&owner),
            Err(BuildError::MissingOwnerAccount { account: owner })
        );
    }

    #[test]
    fn test_create_ata_targets_program() {
        let payer = Pubkey::new_unique();
        let token = Token::new(Pubkey::new_unique(), 9, TokenProgram::Token2022);
        let ix = create_associated_token_account(&payer, &payer, &token);
        assert_eq!(ix.program_id, spl_associated_token_account::id());
        assert_eq!(ix.accounts[1].pubkey, associated_token_address(&payer, &token));
        // idempotent variant
        assert_eq!(ix.data, vec![1]);
    }

    #[test]
    fn test_fee_transfer() {
        let token = Token::new(Pubkey::new_unique(), 6, TokenProgram::Spl);
        let (source, destination, owner) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let ix = fee_transfer_instruction(&token, &source, &destination, &owner, 25).unwrap();
        assert_eq!(ix.program_id, spl_token::id());
        assert_eq!(ix.accounts[0].pubkey, source);
        assert_eq!(ix.accounts[1].pubkey, token.mint);
        assert_eq!(ix.accounts[2].pubkey, destination);
        assert!(ix.accounts[3].is_signer);
    }
}
