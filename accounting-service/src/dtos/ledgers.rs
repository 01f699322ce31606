use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{AccountType, LedgerAccount, LedgerEntry, PartyType, ReferenceType};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLedgerEntryRequest {
    pub party_type: PartyType,
    #[validate(length(min = 1))]
    pub party_id: String,
    /// Exactly one of debit/credit should be nonzero; the posting service
    /// rejects an entry that moves nothing.
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub debit: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub credit: f64,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub id: String,
    pub party_type: PartyType,
    pub party_id: String,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
    pub description: String,
    pub reference_type: ReferenceType,
    pub reference_id: Option<String>,
    pub transaction_date: String,
    pub entered_by: String,
    pub created_at: String,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(e: LedgerEntry) -> Self {
        Self {
            id: e.id,
            party_type: e.party_type,
            party_id: e.party_id,
            debit: e.debit,
            credit: e.credit,
            balance: e.balance,
            description: e.description,
            reference_type: e.reference_type,
            reference_id: e.reference_id,
            transaction_date: e.transaction_date.to_rfc3339(),
            entered_by: e.entered_by,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PartyLedgerResponse {
    pub party_type: PartyType,
    pub party_id: String,
    pub current_balance: f64,
    pub entries: Vec<LedgerEntryResponse>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLedgerAccountRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub opening_balance: f64,
}

#[derive(Debug, Serialize)]
pub struct LedgerAccountResponse {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub opening_balance: f64,
    pub active: bool,
    pub created_at: String,
}

impl From<LedgerAccount> for LedgerAccountResponse {
    fn from(a: LedgerAccount) -> Self {
        Self {
            id: a.id,
            name: a.name,
            account_type: a.account_type,
            opening_balance: a.opening_balance,
            active: a.active,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}
