use crate::db::repository;
use crate::errors::EditError;
use crate::operations::edit::StagedWrite;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Applies a staged write set to the store as one SQLite transaction and
/// returns the ledger's new total balance. If any update fails the
/// transaction is rolled back on drop and no row is changed. An empty set
/// commits trivially and just reports the current total.
pub fn commit(conn: &mut Connection, writes: &[StagedWrite]) -> Result<Decimal, EditError> {
    if !writes.is_empty() {
        let tx = conn
            .transaction()
            .map_err(|e| EditError::Storage(e.to_string()))?;

        let mut by_id: BTreeMap<u64, Vec<(&'static str, String)>> = BTreeMap::new();
        for write in writes {
            by_id
                .entry(write.id)
                .or_default()
                .push((write.value.column(), write.value.to_sql_text()));
        }
        for (id, fields) in &by_id {
            repository::update_fields(&tx, *id, fields).map_err(EditError::Storage)?;
        }

        tx.commit().map_err(|e| EditError::Storage(e.to_string()))?;
        debug!(rows = by_id.len(), writes = writes.len(), "committed staged writes");
    }
    current_total(conn)
}

/// The balance of the highest-id row, or zero for an empty ledger.
pub fn current_total(conn: &Connection) -> Result<Decimal, EditError> {
    let last = repository::get_last_transaction(conn).map_err(EditError::Storage)?;
    Ok(last.map(|t| t.balance).unwrap_or(Decimal::ZERO))
}
