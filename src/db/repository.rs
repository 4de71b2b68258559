use crate::models::transaction::{Transaction, TransactionMode};
use chrono::NaiveDate;
use rusqlite::{Connection, ToSql};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Inserts a new transaction and returns the id the store assigned to it.
/// The caller is responsible for having computed `balance` from the current
/// last row; the store never recalculates anything.
pub fn append_transaction(
    conn: &Connection,
    description: &str,
    mode: TransactionMode,
    trans_amount: Decimal,
    balance: Decimal,
    date_added: NaiveDate,
) -> Result<u64, String> {
    conn.execute(
        "INSERT INTO transactions (description, mode, trans_amount, balance, date_added) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            description,
            mode.as_str(),
            trans_amount.to_string(),
            balance.to_string(),
            date_added.format("%Y-%m-%d").to_string(),
        ],
    )
    .map_err(|e| format!("Failed to insert transaction: {}", e))?;

    let id = conn.last_insert_rowid() as u64;
    debug!(id, balance = %balance, "appended transaction");
    Ok(id)
}

/// The full ledger in application order (ascending id).
pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>, String> {
    let mut stmt = conn
        .prepare("SELECT id, description, mode, trans_amount, balance, date_added FROM transactions ORDER BY id ASC")
        .map_err(|e| format!("Failed to prepare statement: {}", e))?;

    let transaction_iter = stmt
        .query_map([], map_row)
        .map_err(|e| format!("Failed to query transactions: {}", e))?;

    let mut transactions = Vec::new();
    for transaction in transaction_iter {
        transactions.push(transaction.map_err(|e| format!("Failed to parse transaction: {}", e))?);
    }

    Ok(transactions)
}

/// The highest-id row, which carries the ledger's current total balance.
pub fn get_last_transaction(conn: &Connection) -> Result<Option<Transaction>, String> {
    let mut stmt = conn
        .prepare("SELECT id, description, mode, trans_amount, balance, date_added FROM transactions ORDER BY id DESC LIMIT 1")
        .map_err(|e| format!("Failed to prepare statement: {}", e))?;

    let mut rows = stmt
        .query_map([], map_row)
        .map_err(|e| format!("Failed to query transactions: {}", e))?;

    match rows.next() {
        Some(row) => Ok(Some(
            row.map_err(|e| format!("Failed to parse transaction: {}", e))?,
        )),
        None => Ok(None),
    }
}

/// Updates the named columns of one row. Column names come from the engine's
/// staged writes, never from user input.
pub fn update_fields(
    conn: &Connection,
    id: u64,
    fields: &[(&str, String)],
) -> Result<(), String> {
    if fields.is_empty() {
        return Ok(());
    }

    let set_clause = fields
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE transactions SET {} WHERE id = ?{}",
        set_clause,
        fields.len() + 1
    );

    let mut params: Vec<&dyn ToSql> = fields.iter().map(|(_, value)| value as &dyn ToSql).collect();
    params.push(&id);

    let rows_affected = conn
        .execute(&sql, params.as_slice())
        .map_err(|e| format!("Failed to update transaction: {}", e))?;

    if rows_affected == 0 {
        return Err(format!("Transaction with ID {} not found", id));
    }
    debug!(id, columns = fields.len(), "updated transaction fields");
    Ok(())
}

/// Empties the ledger. The total balance is zero afterwards.
pub fn delete_all_transactions(conn: &Connection) -> Result<usize, String> {
    let rows_affected = conn
        .execute("DELETE FROM transactions", [])
        .map_err(|e| format!("Failed to delete transactions: {}", e))?;
    debug!(rows = rows_affected, "deleted all transactions");
    Ok(rows_affected)
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let mode_str: String = row.get(2)?;
    let amount_str: String = row.get(3)?;
    let balance_str: String = row.get(4)?;
    let date_str: String = row.get(5)?;

    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        mode: match mode_str.as_str() {
            "Deposit" => TransactionMode::Deposit,
            "Withdraw" => TransactionMode::Withdraw,
            _ => {
                return Err(rusqlite::Error::InvalidParameterName(
                    "Invalid transaction mode".to_string(),
                ))
            }
        },
        trans_amount: Decimal::from_str(&amount_str)
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
        balance: Decimal::from_str(&balance_str)
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
        date_added: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let conn = establish_test_connection().unwrap();

        let first = append_transaction(
            &conn,
            "Paycheck",
            TransactionMode::Deposit,
            dec("100"),
            dec("100"),
            date("2025-01-15"),
        )
        .unwrap();
        let second = append_transaction(
            &conn,
            "Groceries",
            TransactionMode::Withdraw,
            dec("30"),
            dec("70"),
            date("2025-01-16"),
        )
        .unwrap();

        assert!(second > first);
    }

    #[test]
    fn test_get_all_transactions_in_id_order() {
        let conn = establish_test_connection().unwrap();
        append_transaction(&conn, "A", TransactionMode::Deposit, dec("10"), dec("10"), date("2025-01-03")).unwrap();
        append_transaction(&conn, "B", TransactionMode::Deposit, dec("5"), dec("15"), date("2025-01-01")).unwrap();

        let all = get_all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 2);
        // id order, not date order
        assert_eq!(all[0].description, "A");
        assert_eq!(all[1].description, "B");
        assert!(all[0].id < all[1].id);
    }

    #[test]
    fn test_get_last_transaction() {
        let conn = establish_test_connection().unwrap();
        assert!(get_last_transaction(&conn).unwrap().is_none());

        append_transaction(&conn, "A", TransactionMode::Deposit, dec("10"), dec("10"), date("2025-01-03")).unwrap();
        append_transaction(&conn, "B", TransactionMode::Withdraw, dec("4"), dec("6"), date("2025-01-04")).unwrap();

        let last = get_last_transaction(&conn).unwrap().unwrap();
        assert_eq!(last.description, "B");
        assert_eq!(last.balance, dec("6"));
    }

    #[test]
    fn test_update_fields_changes_named_columns() {
        let conn = establish_test_connection().unwrap();
        let id = append_transaction(&conn, "Rent", TransactionMode::Withdraw, dec("40"), dec("60"), date("2025-01-05")).unwrap();

        update_fields(
            &conn,
            id,
            &[
                ("trans_amount", "55".to_string()),
                ("balance", "45".to_string()),
            ],
        )
        .unwrap();

        let all = get_all_transactions(&conn).unwrap();
        assert_eq!(all[0].trans_amount, dec("55"));
        assert_eq!(all[0].balance, dec("45"));
        assert_eq!(all[0].description, "Rent");
    }

    #[test]
    fn test_update_fields_unknown_id() {
        let conn = establish_test_connection().unwrap();
        let result = update_fields(&conn, 999, &[("description", "x".to_string())]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("not found"));
    }

    #[test]
    fn test_delete_all_transactions() {
        let conn = establish_test_connection().unwrap();
        append_transaction(&conn, "A", TransactionMode::Deposit, dec("10"), dec("10"), date("2025-01-03")).unwrap();
        append_transaction(&conn, "B", TransactionMode::Deposit, dec("10"), dec("20"), date("2025-01-04")).unwrap();

        let removed = delete_all_transactions(&conn).unwrap();
        assert_eq!(removed, 2);
        assert!(get_all_transactions(&conn).unwrap().is_empty());
        assert!(get_last_transaction(&conn).unwrap().is_none());
    }
}
