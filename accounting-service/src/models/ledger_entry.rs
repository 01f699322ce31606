//! Running-balance ledger entry.
//!
//! Every booking, payment, voucher, or manual adjustment appends one row per
//! affected party. Rows are append-mostly: the only mutation after insert is
//! the `active` soft-delete flag, and deactivating a row does not recompute
//! the balances of later rows. `balance` is always as of the time of
//! posting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which collection the party lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyType {
    Customer,
    Executive,
    LedgerAccount,
}

impl PartyType {
    /// Get string representation for database filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Executive => "executive",
            Self::LedgerAccount => "ledger_account",
        }
    }
}

impl std::fmt::Display for PartyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "executive" => Ok(Self::Executive),
            "ledger_account" => Ok(Self::LedgerAccount),
            _ => Err(format!("Invalid party type: {}", s)),
        }
    }
}

/// What produced a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Booking,
    Payment,
    PaymentReversal,
    JournalVoucher,
    OpeningBalance,
    Manual,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Payment => "payment",
            Self::PaymentReversal => "payment_reversal",
            Self::JournalVoucher => "journal_voucher",
            Self::OpeningBalance => "opening_balance",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub party_type: PartyType,
    pub party_id: String,
    pub debit: f64,
    pub credit: f64,
    /// Signed running total for (party_type, party_id) as of this row.
    pub balance: f64,
    pub description: String,
    pub reference_type: ReferenceType,
    pub reference_id: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub transaction_date: DateTime<Utc>,
    pub entered_by: String,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        party_type: PartyType,
        party_id: String,
        debit: f64,
        credit: f64,
        balance: f64,
        description: String,
        reference_type: ReferenceType,
        reference_id: Option<String>,
        transaction_date: DateTime<Utc>,
        entered_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            party_type,
            party_id,
            debit,
            credit,
            balance,
            description,
            reference_type,
            reference_id,
            transaction_date,
            entered_by,
            active: true,
            created_at: Utc::now(),
        }
    }

}

/// The running-balance recurrence: new balance from the previous one.
pub fn next_balance(previous: f64, debit: f64, credit: f64) -> f64 {
    previous + debit - credit
}
