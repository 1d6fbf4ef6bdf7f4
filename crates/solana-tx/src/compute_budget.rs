//! Compute budget prefix

use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;

use router_core::ComputeBudgetConfig;

/// Priority fee then unit limit, prepended to every transaction
pub fn compute_budget_instructions(config: &ComputeBudgetConfig) -> Vec<Instruction> {
    vec![
        ComputeBudgetInstruction::set_compute_unit_price(config.micro_lamports),
        ComputeBudgetInstruction::set_compute_unit_limit(config.units),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::compute_budget;

    #[test]
    fn test_price_precedes_limit() {
        let ixs = compute_budget_instructions(&ComputeBudgetConfig::default());
        assert_eq!(ixs.len(), 2);
        assert!(ixs.iter().all(|ix| ix.program_id == compute_budget::id()));
        assert_eq!(
            ixs[0],
            ComputeBudgetInstruction::set_compute_unit_price(1)
        );
        assert_eq!(
            ixs[1],
            ComputeBudgetInstruction::set_compute_unit_limit(400_000)
        );
    }
}
