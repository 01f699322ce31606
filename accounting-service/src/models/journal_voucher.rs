//! Manual two-sided journal vouchers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger_entry::PartyType;

/// One side of a voucher: the party whose ledger takes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherSide {
    pub party_type: PartyType,
    pub party_id: String,
    pub account_name: String,
}

/// A manual double-sided entry. The voucher and its two ledger rows are
/// written in a single multi-document transaction; there is no state in
/// which only one side is visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalVoucher {
    #[serde(rename = "_id")]
    pub id: String,
    /// Unique, sequence-backed: "JV-1001", "JV-1002", ...
    pub jv_number: String,
    pub branch: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub transaction_date: DateTime<Utc>,
    pub debit_account: VoucherSide,
    pub credit_account: VoucherSide,
    pub amount: f64,
    pub narration: String,
    pub active: bool,
    pub entered_by: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl JournalVoucher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jv_number: String,
        branch: Option<String>,
        transaction_date: DateTime<Utc>,
        debit_account: VoucherSide,
        credit_account: VoucherSide,
        amount: f64,
        narration: String,
        entered_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            jv_number,
            branch,
            transaction_date,
            debit_account,
            credit_account,
            amount,
            narration,
            active: true,
            entered_by,
            created_at: Utc::now(),
        }
    }

    /// Voucher number for the nth voucher (1-based sequence).
    pub fn format_number(seq: i64) -> String {
        format!("JV-{}", 1000 + seq)
    }
}

/// Atomic sequence document backing voucher numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub name: String,
    pub seq: i64,
}
