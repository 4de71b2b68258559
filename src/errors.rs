use rust_decimal::Decimal;
use thiserror::Error;

/// Every way a submitted transaction or an in-place edit can be rejected.
///
/// Validation errors are raised before any recomputation is attempted and
/// never touch the store. `NegativeResult` comes out of the balance
/// projection; the staged write set is empty whenever it is returned.
/// `Storage` wraps a failure in the SQLite layer; after seeing one the
/// caller must re-read the ledger before attempting another edit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("mode must be exactly 'Deposit' or 'Withdraw'")]
    InvalidMode,
    #[error("invalid date, expected YYYY-MM-DD")]
    InvalidDate,
    #[error("description must not be empty")]
    EmptyRequiredField,
    #[error("no transaction at row {0}")]
    UnknownRow(usize),
    #[error("there is not enough money to withdraw {0}")]
    InsufficientFunds(Decimal),
    #[error("resulting calculation is negative, reverting all changes (row {at_index})")]
    NegativeResult { at_index: usize },
    #[error("storage error: {0}")]
    Storage(String),
}
