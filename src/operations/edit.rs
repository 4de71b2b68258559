use crate::db::repository;
use crate::errors::EditError;
use crate::models::transaction::{Transaction, TransactionMode};
use crate::operations::commit;
use crate::operations::project::project;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

/// Which field of a row an edit targets. Dispatch is by field identity, not
/// by column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Description,
    Mode,
    TransAmount,
    Date,
    Balance,
}

impl EditField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "description" => Some(EditField::Description),
            "mode" => Some(EditField::Mode),
            "amount" | "trans_amount" => Some(EditField::TransAmount),
            "date" | "date_added" => Some(EditField::Date),
            "balance" => Some(EditField::Balance),
            _ => None,
        }
    }
}

/// A raw edit as collected by the presentation layer: row position in the
/// ledger snapshot, target field and the new value as entered.
#[derive(Debug, Clone)]
pub struct EditIntent {
    pub row: usize,
    pub field: EditField,
    pub value: String,
}

/// A field-level update that has been computed but not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedWrite {
    pub id: u64,
    pub value: StagedValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StagedValue {
    Description(String),
    Mode(TransactionMode),
    TransAmount(Decimal),
    Balance(Decimal),
    DateAdded(NaiveDate),
}

impl StagedValue {
    pub fn column(&self) -> &'static str {
        match self {
            StagedValue::Description(_) => "description",
            StagedValue::Mode(_) => "mode",
            StagedValue::TransAmount(_) => "trans_amount",
            StagedValue::Balance(_) => "balance",
            StagedValue::DateAdded(_) => "date_added",
        }
    }

    pub fn to_sql_text(&self) -> String {
        match self {
            StagedValue::Description(text) => text.clone(),
            StagedValue::Mode(mode) => mode.as_str().to_string(),
            StagedValue::TransAmount(amount) => amount.to_string(),
            StagedValue::Balance(balance) => balance.to_string(),
            StagedValue::DateAdded(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Turns one edit intent into the staged writes that make the ledger
/// consistent again, or rejects it. Never stages a partial result: the
/// returned set is complete for the edit or the error carries nothing.
pub fn resolve(snapshot: &[Transaction], intent: &EditIntent) -> Result<Vec<StagedWrite>, EditError> {
    let row = intent.row;
    let record = snapshot.get(row).ok_or(EditError::UnknownRow(row))?;

    match intent.field {
        EditField::Description => {
            // Pass-through, no balance impact. Empty text is allowed here;
            // the submit path is where non-empty is enforced.
            Ok(vec![StagedWrite {
                id: record.id,
                value: StagedValue::Description(intent.value.clone()),
            }])
        }
        EditField::Date => {
            let date = NaiveDate::parse_from_str(intent.value.trim(), "%Y-%m-%d")
                .map_err(|_| EditError::InvalidDate)?;
            Ok(vec![StagedWrite {
                id: record.id,
                value: StagedValue::DateAdded(date),
            }])
        }
        EditField::Balance => {
            // Derived column; direct edits are ignored.
            Ok(Vec::new())
        }
        EditField::Mode => {
            let new_mode: TransactionMode =
                intent.value.parse().map_err(|_| EditError::InvalidMode)?;
            if new_mode == record.mode {
                return Ok(Vec::new());
            }
            let mut writes = vec![StagedWrite {
                id: record.id,
                value: StagedValue::Mode(new_mode),
            }];
            writes.extend(rebalance_from(snapshot, row, new_mode, record.trans_amount)?);
            Ok(writes)
        }
        EditField::TransAmount => {
            let new_amount: Decimal = intent
                .value
                .trim()
                .parse()
                .map_err(|_| EditError::InvalidAmount)?;
            if new_amount <= Decimal::ZERO {
                return Err(EditError::InvalidAmount);
            }
            if new_amount == record.trans_amount {
                return Ok(Vec::new());
            }
            let mut writes = vec![StagedWrite {
                id: record.id,
                value: StagedValue::TransAmount(new_amount),
            }];
            writes.extend(rebalance_from(snapshot, row, record.mode, new_amount)?);
            Ok(writes)
        }
    }
}

/// Recomputes the edited row's balance from the row before it (zero when the
/// edit is on the first row), then projects every later row with its own
/// mode and amount unchanged. For a mode flip this moves the edited row's
/// balance by twice its amount: once to undo the old sign, once to apply the
/// new one. Only balances that actually change are staged.
fn rebalance_from(
    snapshot: &[Transaction],
    row: usize,
    mode: TransactionMode,
    amount: Decimal,
) -> Result<Vec<StagedWrite>, EditError> {
    let prior = if row == 0 {
        Decimal::ZERO
    } else {
        snapshot[row - 1].balance
    };
    let adjusted = prior + mode.signed(amount);
    if adjusted < Decimal::ZERO {
        return Err(EditError::NegativeResult { at_index: row });
    }

    let tail: Vec<(TransactionMode, Decimal)> = snapshot[row + 1..]
        .iter()
        .map(|t| (t.mode, t.trans_amount))
        .collect();
    let projected = project(adjusted, &tail).map_err(|violation| EditError::NegativeResult {
        at_index: row + 1 + violation.at_index,
    })?;

    let mut writes = Vec::with_capacity(projected.len() + 1);
    if adjusted != snapshot[row].balance {
        writes.push(StagedWrite {
            id: snapshot[row].id,
            value: StagedValue::Balance(adjusted),
        });
    }
    for (record, balance) in snapshot[row + 1..].iter().zip(projected) {
        if record.balance != balance {
            writes.push(StagedWrite {
                id: record.id,
                value: StagedValue::Balance(balance),
            });
        }
    }
    Ok(writes)
}

/// The whole edit pipeline: snapshot the ledger, resolve the intent into a
/// staged write set, commit it as one unit. Returns the new total balance.
/// Runs synchronously to a terminal state; the caller processes one intent
/// at a time.
pub fn apply_edit(conn: &mut Connection, intent: &EditIntent) -> Result<Decimal, EditError> {
    let snapshot = repository::get_all_transactions(conn).map_err(EditError::Storage)?;
    let writes = resolve(&snapshot, intent)?;
    debug!(row = intent.row, staged = writes.len(), "resolved edit");
    commit::commit(conn, &writes)
}
