use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Direction of a transaction. The two literals are stored verbatim in the
/// database and in exported ledgers, so parsing is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    Deposit,
    Withdraw,
}

impl TransactionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionMode::Deposit => "Deposit",
            TransactionMode::Withdraw => "Withdraw",
        }
    }

    /// The amount this mode contributes to a running balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionMode::Deposit => amount,
            TransactionMode::Withdraw => -amount,
        }
    }
}

impl FromStr for TransactionMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deposit" => Ok(TransactionMode::Deposit),
            "Withdraw" => Ok(TransactionMode::Withdraw),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the ledger. `id` is assigned by the store and defines the
/// application order; `balance` is the running total immediately after this
/// transaction and is only ever written by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub description: String,
    pub mode: TransactionMode,
    pub trans_amount: Decimal,
    pub balance: Decimal,
    pub date_added: NaiveDate,
}

impl Transaction {
    pub fn new(
        id: u64,
        description: String,
        mode: TransactionMode,
        trans_amount: Decimal,
        balance: Decimal,
        date_added: NaiveDate,
    ) -> Self {
        Self {
            id,
            description,
            mode,
            trans_amount,
            balance,
            date_added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_is_case_sensitive() {
        assert_eq!("Deposit".parse::<TransactionMode>(), Ok(TransactionMode::Deposit));
        assert_eq!("Withdraw".parse::<TransactionMode>(), Ok(TransactionMode::Withdraw));
        assert!("deposit".parse::<TransactionMode>().is_err());
        assert!("WITHDRAW".parse::<TransactionMode>().is_err());
        assert!("Income".parse::<TransactionMode>().is_err());
        assert!("".parse::<TransactionMode>().is_err());
    }

    #[test]
    fn test_mode_signed_contribution() {
        let amount: Decimal = "25.50".parse().unwrap();
        assert_eq!(TransactionMode::Deposit.signed(amount), amount);
        assert_eq!(TransactionMode::Withdraw.signed(amount), -amount);
    }
}
