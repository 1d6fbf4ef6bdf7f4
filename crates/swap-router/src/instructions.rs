//! Instruction Builder
//!
//! Turns a route into the ordered instructions that execute it:
//!
//! 1. Idempotent creation of every token account the route needs and the
//!    wallet does not hold, once per mint
//! 2. Wrapping of native SOL input
//! 3. One swap per hop, each spending only what the hop before it guarantees
//! 4. Integrator fee transfer
//! 5. Unwrapping of native SOL

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use tracing::debug;

use router_core::{BuildError, Token};
use solana_tx::{
    create_associated_token_account, fee_transfer_instruction, unwrap_native_instruction,
    wrap_native_instructions, InstructionKind, PlannedInstruction, ResolvedAccount, WalletContext,
};

use crate::evaluate::SimulatedHop;
use crate::pool::PoolState;
use crate::select::Route;

/// Token accounts resolved so far and the creations they require
struct AccountPlan<'a> {
    wallet: &'a WalletContext,
    accounts: HashMap<Pubkey, ResolvedAccount>,
    creates: Vec<PlannedInstruction>,
}

impl<'a> AccountPlan<'a> {
    fn new(wallet: &'a WalletContext) -> Self {
        Self {
            wallet,
            accounts: HashMap::new(),
            creates: Vec::new(),
        }
    }

    fn account(&mut self, token: &Token) -> Pubkey {
        if let Some(resolved) = self.accounts.get(&token.mint) {
            return resolved.address;
        }
        let resolved = self.wallet.resolve(token);
        if !resolved.exists {
            let owner = self.wallet.owner;
            self.creates.push(
                PlannedInstruction::new(
                    InstructionKind::CreateAccount,
                    create_associated_token_account(&owner, &owner, token),
                )
                .creating(resolved.address),
            );
        }
        self.accounts.insert(token.mint, resolved);
        resolved.address
    }

    fn created(&self, mint: &Pubkey) -> bool {
        self.accounts.get(mint).is_some_and(|resolved| !resolved.exists)
    }
}

fn swap_instruction(
    hop: &SimulatedHop,
    owner: Pubkey,
    source: Pubkey,
    destination: Pubkey,
) -> Result<Instruction, BuildError> {
    match &hop.pool {
        PoolState::ConstantProduct(pool) => {
            let user = amm::UserSwapAccounts {
                owner,
                source,
                destination,
            };
            amm::build_swap_instruction(pool, &user, hop.guaranteed_in, hop.minimum_amount_out)
        }
        PoolState::Concentrated(pool) => {
            let a_to_b = pool
                .direction(&hop.token_in.mint)
                .map_err(|e| BuildError::Instruction {
                    message: e.to_string(),
                })?;
            let user = clmm::UserSwapAccounts {
                owner,
                source,
                destination,
            };
            clmm::build_swap_instruction(
                pool,
                &user,
                a_to_b,
                hop.guaranteed_in,
                hop.minimum_amount_out,
                &hop.tick_arrays,
            )
        }
    }
}

/// Build the instructions executing `route` for `wallet`.
///
/// Every hop after the first spends the previous hop's minimum, so the
/// last hop's minimum is the path's minimum. With `wrap_native`, native SOL input
/// is wrapped up front and the wrapped account is closed at the end when the
/// output is SOL or the account was created here.
pub fn build_instructions(
    route: &Route,
    wallet: &WalletContext,
    wrap_native: bool,
) -> Result<Vec<PlannedInstruction>, BuildError> {
    if route.paths.is_empty() {
        return Err(BuildError::EmptyRoute);
    }
    let owner = wallet.owner;
    wallet.require_signer(&owner)?;

    let mut plan = AccountPlan::new(wallet);
    let input_account = plan.account(&route.input);

    let mut body = Vec::new();
    if wrap_native && route.input.is_native() {
        for instruction in wrap_native_instructions(&owner, &input_account, route.total_input())? {
            body.push(PlannedInstruction::new(InstructionKind::WrapNative, instruction));
        }
    }

    for path in &route.paths {
        for hop in &path.hops {
            let source = plan.account(&hop.token_in);
            let destination = plan.account(&hop.token_out);
            let instruction = swap_instruction(hop, owner, source, destination)?;
            body.push(PlannedInstruction::new(InstructionKind::Swap, instruction));
        }
    }

    if let Some(fee) = route.fee.filter(|fee| fee.amount > 0) {
        let instruction = fee_transfer_instruction(
            &route.input,
            &input_account,
            &fee.config.fee_account,
            &owner,
            fee.amount,
        )?;
        body.push(PlannedInstruction::new(InstructionKind::FeeTransfer, instruction));
    }

    if wrap_native {
        let native = Token::native();
        let unwrap = route.output.is_native()
            || (route.input.is_native() && plan.created(&native.mint));
        if unwrap {
            let wsol_account = plan.account(&native);
            body.push(PlannedInstruction::new(
                InstructionKind::CloseAccount,
                unwrap_native_instruction(&owner, &wsol_account)?,
            ));
        }
    }

    let mut planned = plan.creates;
    planned.extend(body);
    debug!(
        instructions = planned.len(),
        paths = route.paths.len(),
        "built route instructions"
    );
    Ok(planned)
}
