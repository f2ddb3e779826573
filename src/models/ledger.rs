use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownTransactionType(pub String);

/// Kind of stock movement recorded in the ledger. Only issuance produces
/// entries today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Issue,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Issue => "issue",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(TransactionType::Issue),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

// Lets `FromRow` decode the TEXT column straight into the enum.
impl TryFrom<String> for TransactionType {
    type Error = UnknownTransactionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct IssuedItem {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub quantity_issued: i64,
    pub date_issued: NaiveDate,
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIssuedItem {
    pub item_id: i64,
    pub name: String,
    pub quantity_issued: i64,
    pub date_issued: NaiveDate,
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub item_id: i64,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub transaction_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub item_id: i64,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub transaction_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct IssuedItemDisplay {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub quantity_issued: i64,
    pub date_issued: String,
    pub department_name: String,
}

impl From<IssuedItem> for IssuedItemDisplay {
    fn from(issued: IssuedItem) -> Self {
        Self {
            id: issued.id,
            item_id: issued.item_id,
            name: issued.name,
            quantity_issued: issued.quantity_issued,
            date_issued: issued.date_issued.format("%Y-%m-%d").to_string(),
            department_name: issued.department_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerEntryDisplay {
    pub id: i64,
    pub transaction_type: String,
    pub quantity: i64,
    pub transaction_date: String,
}

impl From<LedgerEntry> for LedgerEntryDisplay {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            transaction_type: entry.transaction_type.to_string(),
            quantity: entry.quantity,
            transaction_date: entry.transaction_date.format("%Y-%m-%d").to_string(),
        }
    }
}
