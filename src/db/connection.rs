use rusqlite::{Connection, Result};
use tracing::debug;

pub const DB_PATH: &str = "transaction_db.db";

pub fn establish_connection() -> Result<Connection> {
    let conn = Connection::open(DB_PATH)?;
    debug!(path = DB_PATH, "opened transaction database");
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Creates the transactions table if it is missing. Also called after a
/// ledger import so the store stays usable when the imported file carried
/// no schema statement.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            mode TEXT NOT NULL CHECK (mode IN ('Deposit', 'Withdraw')),
            trans_amount TEXT NOT NULL,
            balance TEXT NOT NULL,
            date_added TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}
