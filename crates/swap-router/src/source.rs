//! Collaborator seams: pool data in, signed transactions out

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;

use clmm::TickArrays;
use router_core::SourceError;
use solana_tx::{TransactionBundle, WalletContext};

use crate::pool::PoolState;

/// Pool programs a fetch covers; empty means every program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFilter {
    #[serde(default)]
    pub programs: Vec<Pubkey>,
}

impl ProgramFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(programs: impl IntoIterator<Item = Pubkey>) -> Self {
        Self {
            programs: programs.into_iter().collect(),
        }
    }

    pub fn matches(&self, program_id: &Pubkey) -> bool {
        self.programs.is_empty() || self.programs.contains(program_id)
    }
}

/// Store of decoded on-chain state
#[async_trait]
pub trait PoolSource: Send + Sync {
    /// Decoded pools owned by the filtered programs; may be partial
    async fn fetch_pool_list(&self, filter: &ProgramFilter) -> Result<Vec<PoolState>, SourceError>;

    /// Tick arrays keyed by pool id for concentrated pools
    async fn fetch_tick_arrays(
        &self,
        pool_ids: &[Pubkey],
    ) -> Result<HashMap<Pubkey, TickArrays>, SourceError>;

    /// Owner's token accounts keyed by mint
    async fn fetch_wallet_token_accounts(
        &self,
        owner: &Pubkey,
    ) -> Result<HashMap<Pubkey, Pubkey>, SourceError>;
}

/// Signing and broadcast; retry and confirmation policy live here
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn sign_and_submit(
        &self,
        bundles: &[TransactionBundle],
    ) -> Result<Vec<Signature>, SourceError>;
}

/// Wallet context for `owner` populated from the source
pub async fn load_wallet<S: PoolSource + ?Sized>(
    source: &S,
    owner: Pubkey,
) -> Result<WalletContext, SourceError> {
    let mut wallet = WalletContext::new(owner);
    wallet.token_accounts = source.fetch_wallet_token_accounts(&owner).await?;
    Ok(wallet)
}
