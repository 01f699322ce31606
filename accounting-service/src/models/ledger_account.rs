use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Cash,
    Income,
    Expense,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Other => "other",
        }
    }
}

/// Named book account (bank, cash box, brokerage payable, ...). Account
/// names are unique; a nonzero opening balance produces an opening ledger
/// row at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub opening_balance: f64,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl LedgerAccount {
    pub fn new(name: String, account_type: AccountType, opening_balance: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            account_type,
            opening_balance,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
