use crate::models::transaction::TransactionMode;
use rust_decimal::Decimal;

/// Signalled when a projection would take a running balance below zero.
/// `at_index` is the offset into the projected tail, not a ledger row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeBalanceViolation {
    pub at_index: usize,
}

/// Applies each (mode, amount) pair in order starting from `seed` and returns
/// the running balance after every step. Stops at the first step that would
/// go negative and returns no partial sequence, so a caller either gets a
/// fully consistent tail or nothing.
///
/// Pure function, no I/O; the whole cascading recompute is testable without
/// touching the store.
pub fn project(
    seed: Decimal,
    tail: &[(TransactionMode, Decimal)],
) -> Result<Vec<Decimal>, NegativeBalanceViolation> {
    let mut running = seed;
    let mut balances = Vec::with_capacity(tail.len());
    for (index, (mode, amount)) in tail.iter().enumerate() {
        running += mode.signed(*amount);
        if running < Decimal::ZERO {
            return Err(NegativeBalanceViolation { at_index: index });
        }
        balances.push(running);
    }
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionMode::{Deposit, Withdraw};

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_project_empty_tail() {
        assert_eq!(project(dec("42"), &[]), Ok(vec![]));
    }

    #[test]
    fn test_project_deposits_and_withdrawals() {
        let tail = [
            (Deposit, dec("100")),
            (Withdraw, dec("30")),
            (Deposit, dec("50")),
        ];
        let balances = project(Decimal::ZERO, &tail).unwrap();
        assert_eq!(balances, vec![dec("100"), dec("70"), dec("120")]);
    }

    #[test]
    fn test_project_flags_first_negative_step() {
        let tail = [
            (Withdraw, dec("30")),
            (Withdraw, dec("30")),
        ];
        let result = project(dec("50"), &tail);
        assert_eq!(result, Err(NegativeBalanceViolation { at_index: 1 }));
    }

    #[test]
    fn test_project_first_row_withdraw_from_zero() {
        // A withdrawal as the very first entry can never be valid.
        let tail = [(Withdraw, dec("40"))];
        let result = project(Decimal::ZERO, &tail);
        assert_eq!(result, Err(NegativeBalanceViolation { at_index: 0 }));
    }

    #[test]
    fn test_project_allows_exact_zero() {
        let tail = [(Withdraw, dec("30"))];
        assert_eq!(project(dec("30"), &tail), Ok(vec![dec("0")]));
    }

    #[test]
    fn test_project_stops_before_later_entries() {
        // Nothing after the violating step is evaluated or returned.
        let tail = [
            (Withdraw, dec("10")),
            (Deposit, dec("1000")),
        ];
        let result = project(dec("5"), &tail);
        assert_eq!(result, Err(NegativeBalanceViolation { at_index: 0 }));
    }

    #[test]
    fn test_project_handles_cents_exactly() {
        let tail = [
            (Deposit, dec("0.10")),
            (Deposit, dec("0.20")),
            (Withdraw, dec("0.30")),
        ];
        let balances = project(Decimal::ZERO, &tail).unwrap();
        assert_eq!(balances, vec![dec("0.10"), dec("0.30"), dec("0.00")]);
    }
}
