use crate::db::repository;
use crate::errors::EditError;
use crate::models::transaction::{Transaction, TransactionMode};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

/// Appends a new transaction to the end of the ledger. The balance is the
/// previous last balance (zero for an empty ledger) with this amount applied;
/// a withdrawal that would go below zero is rejected before anything is
/// written.
pub fn submit_transaction(
    conn: &Connection,
    description: &str,
    mode: TransactionMode,
    amount: Decimal,
    date_added: NaiveDate,
) -> Result<Transaction, EditError> {
    if description.trim().is_empty() {
        return Err(EditError::EmptyRequiredField);
    }
    if amount <= Decimal::ZERO {
        return Err(EditError::InvalidAmount);
    }

    let last_balance = repository::get_last_transaction(conn)
        .map_err(EditError::Storage)?
        .map(|t| t.balance)
        .unwrap_or(Decimal::ZERO);

    let balance = last_balance + mode.signed(amount);
    if balance < Decimal::ZERO {
        return Err(EditError::InsufficientFunds(amount));
    }

    let id = repository::append_transaction(conn, description, mode, amount, balance, date_added)
        .map_err(EditError::Storage)?;
    info!(id, balance = %balance, "transaction saved");

    Ok(Transaction::new(
        id,
        description.to_string(),
        mode,
        amount,
        balance,
        date_added,
    ))
}
