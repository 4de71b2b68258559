use crate::db::{connection, repository};
use crate::models::transaction::Transaction;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const SCHEMA_STATEMENT: &str = "CREATE TABLE transactions(id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL, mode TEXT NOT NULL, trans_amount TEXT NOT NULL, balance TEXT NOT NULL, date_added TEXT NOT NULL);";

/// Writes the whole ledger to a portable text file: the schema statement
/// first, then one insert per record with literal values in column order.
/// No recalculation happens here. Returns the number of exported records.
pub fn export_ledger(conn: &Connection, path: &Path) -> Result<usize, String> {
    let transactions = repository::get_all_transactions(conn)?;

    let mut out = String::new();
    out.push_str(SCHEMA_STATEMENT);
    out.push('\n');
    for transaction in &transactions {
        out.push_str(&insert_statement(transaction));
        out.push('\n');
    }

    fs::write(path, out).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    debug!(records = transactions.len(), path = %path.display(), "exported ledger");
    Ok(transactions.len())
}

/// Replaces the entire ledger with the contents of an exported file. The
/// existing table is dropped and the file is replayed statement by
/// statement, so a bad line aborts the replay mid-way with whatever earlier
/// statements already did. Returns the number of records after the import.
pub fn import_ledger(conn: &Connection, path: &Path) -> Result<usize, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

    warn!(path = %path.display(), "importing ledger, existing transactions will be replaced");
    conn.execute("DROP TABLE IF EXISTS transactions", [])
        .map_err(|e| format!("Failed to clear existing ledger: {}", e))?;

    for (line_index, line) in contents.lines().enumerate() {
        let statement = line.trim();
        if statement.is_empty() {
            continue;
        }
        conn.execute(statement, [])
            .map_err(|e| format!("Import failed on line {}: {}", line_index + 1, e))?;
    }

    // A file without a schema statement must not leave the store unusable.
    connection::ensure_schema(conn).map_err(|e| format!("Failed to restore schema: {}", e))?;

    let count = repository::get_all_transactions(conn)?.len();
    debug!(records = count, "imported ledger");
    Ok(count)
}

fn insert_statement(transaction: &Transaction) -> String {
    format!(
        "INSERT INTO transactions (id, description, mode, trans_amount, balance, date_added) VALUES ({}, '{}', '{}', '{}', '{}', '{}');",
        transaction.id,
        escape(&transaction.description),
        transaction.mode.as_str(),
        transaction.trans_amount,
        transaction.balance,
        transaction.date_added.format("%Y-%m-%d"),
    )
}

fn escape(text: &str) -> String {
    text.replace('\'', "''")
}
