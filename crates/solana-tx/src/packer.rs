//! Transaction Packer
//!
//! Groups planned instructions into v0 transactions that stay under the
//! packet size and account-lock ceilings.
//!
//! Instructions are first put in dependency order: anything that creates an
//! account moves ahead of every instruction that touches that account, and
//! the original order is kept otherwise. Packing is then greedy; each
//! transaction takes instructions until the next one would overflow.

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use tracing::debug;

use router_core::{BuildError, ComputeBudgetConfig, PackingConfig};

use crate::compute_budget::compute_budget_instructions;

/// Role of an instruction within a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    ComputeBudget,
    CreateAccount,
    WrapNative,
    Swap,
    FeeTransfer,
    CloseAccount,
}

/// Instruction plus the account it creates, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstruction {
    pub kind: InstructionKind,
    pub instruction: Instruction,
    pub creates: Option<Pubkey>,
}

impl PlannedInstruction {
    pub fn new(kind: InstructionKind, instruction: Instruction) -> Self {
        Self {
            kind,
            instruction,
            creates: None,
        }
    }

    pub fn creating(mut self, account: Pubkey) -> Self {
        self.creates = Some(account);
        self
    }

    fn touches(&self, account: &Pubkey) -> bool {
        self.instruction
            .accounts
            .iter()
            .any(|meta| meta.pubkey == *account)
    }
}

/// Instructions that fit in one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBundle {
    /// Compute budget prefix included
    pub instructions: Vec<Instruction>,
    /// Size of the signed transaction on the wire
    pub serialized_size: usize,
    /// Distinct account keys, programs included
    pub account_count: usize,
}

impl TransactionBundle {
    /// Compile the bundle for signing
    pub fn message(&self, payer: &Pubkey, recent_blockhash: Hash) -> Result<VersionedMessage, BuildError> {
        compile(payer, &self.instructions, recent_blockhash).map(VersionedMessage::V0)
    }
}

fn compile(payer: &Pubkey, instructions: &[Instruction], blockhash: Hash) -> Result<v0::Message, BuildError> {
    v0::Message::try_compile(payer, instructions, &[], blockhash).map_err(|e| BuildError::Compile {
        message: e.to_string(),
    })
}

/// Wire size and account count of a transaction holding `instructions`.
///
/// Signatures are counted as placeholders, one per required signer.
pub fn measure(payer: &Pubkey, instructions: &[Instruction]) -> Result<(usize, usize), BuildError> {
    let message = compile(payer, instructions, Hash::default())?;
    let accounts = message.account_keys.len();
    let transaction = VersionedTransaction {
        signatures: vec![Signature::default(); usize::from(message.header.num_required_signatures)],
        message: VersionedMessage::V0(message),
    };
    let size = bincode::serialized_size(&transaction).map_err(|e| BuildError::Compile {
        message: e.to_string(),
    })?;
    Ok((size as usize, accounts))
}

/// Indices of `planned` with every creator ahead of its consumers
fn dependency_order(planned: &[PlannedInstruction]) -> Vec<usize> {
    let depends_on: Vec<Vec<usize>> = planned
        .iter()
        .enumerate()
        .map(|(i, consumer)| {
            planned
                .iter()
                .enumerate()
                .filter(|(j, creator)| {
                    *j != i && creator.creates.is_some_and(|account| consumer.touches(&account))
                })
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut placed = vec![false; planned.len()];
    let mut visiting = vec![false; planned.len()];
    let mut order = Vec::with_capacity(planned.len());
    for i in 0..planned.len() {
        place(i, &depends_on, &mut placed, &mut visiting, &mut order);
    }
    order
}

/// Place the creators `i` depends on, then `i`. A creation cycle is broken
/// at the instruction already being placed.
fn place(
    i: usize,
    depends_on: &[Vec<usize>],
    placed: &mut [bool],
    visiting: &mut [bool],
    order: &mut Vec<usize>,
) {
    if placed[i] || visiting[i] {
        return;
    }
    visiting[i] = true;
    for &j in &depends_on[i] {
        place(j, depends_on, placed, visiting, order);
    }
    placed[i] = true;
    order.push(i);
}

/// Stable reorder so each account creation precedes its consumers
pub fn order_dependencies(planned: &[PlannedInstruction]) -> Vec<PlannedInstruction> {
    dependency_order(planned)
        .into_iter()
        .map(|i| planned[i].clone())
        .collect()
}

/// Pack `planned` into as few transactions as the ceilings allow.
///
/// The compute budget pair, when configured, leads every transaction and
/// counts against its ceilings. A single instruction that cannot fit even
/// alone fails the whole call with `InstructionTooLarge`.
pub fn pack(
    planned: &[PlannedInstruction],
    payer: &Pubkey,
    config: &PackingConfig,
    compute_budget: Option<&ComputeBudgetConfig>,
) -> Result<Vec<TransactionBundle>, BuildError> {
    let prefix = compute_budget.map(compute_budget_instructions).unwrap_or_default();
    let fits = |size: usize, accounts: usize| {
        size <= config.max_transaction_bytes && accounts <= config.max_accounts
    };

    let mut bundles = Vec::new();
    let mut current = prefix.clone();
    let mut current_measure: Option<(usize, usize)> = None;

    for index in dependency_order(planned) {
        let instruction = &planned[index].instruction;

        let mut candidate = current.clone();
        candidate.push(instruction.clone());
        let (size, accounts) = measure(payer, &candidate)?;
        if fits(size, accounts) {
            current = candidate;
            current_measure = Some((size, accounts));
            continue;
        }

        let mut alone = prefix.clone();
        alone.push(instruction.clone());
        let (alone_size, alone_accounts) = measure(payer, &alone)?;
        if !fits(alone_size, alone_accounts) {
            return Err(BuildError::InstructionTooLarge {
                index,
                size: alone_size,
                max_size: config.max_transaction_bytes,
                accounts: alone_accounts,
                max_accounts: config.max_accounts,
            });
        }

        if let Some((serialized_size, account_count)) = current_measure.take() {
            bundles.push(TransactionBundle {
                instructions: std::mem::replace(&mut current, alone),
                serialized_size,
                account_count,
            });
        } else {
            current = alone;
        }
        current_measure = Some((alone_size, alone_accounts));
    }

    if let Some((serialized_size, account_count)) = current_measure {
        bundles.push(TransactionBundle {
            instructions: current,
            serialized_size,
            account_count,
        });
    }

    debug!(
        instructions = planned.len(),
        transactions = bundles.len(),
        "packed instructions"
    );
    Ok(bundles)
}
