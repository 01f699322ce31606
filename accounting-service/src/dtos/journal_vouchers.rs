use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{JournalVoucher, PartyType};

#[derive(Debug, Deserialize, Validate)]
pub struct VoucherSideRequest {
    pub party_type: PartyType,
    #[validate(length(min = 1))]
    pub party_id: String,
    #[validate(length(min = 1, max = 200))]
    pub account_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalVoucherRequest {
    pub branch: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub debit_account: VoucherSideRequest,
    #[validate(nested)]
    pub credit_account: VoucherSideRequest,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(min = 1, max = 500))]
    pub narration: String,
}

#[derive(Debug, Deserialize)]
pub struct VoucherListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct VoucherSideResponse {
    pub party_type: PartyType,
    pub party_id: String,
    pub account_name: String,
}

#[derive(Debug, Serialize)]
pub struct JournalVoucherResponse {
    pub id: String,
    pub jv_number: String,
    pub branch: Option<String>,
    pub transaction_date: String,
    pub debit_account: VoucherSideResponse,
    pub credit_account: VoucherSideResponse,
    pub amount: f64,
    pub narration: String,
    pub active: bool,
    pub entered_by: String,
    pub created_at: String,
}

impl From<JournalVoucher> for JournalVoucherResponse {
    fn from(v: JournalVoucher) -> Self {
        Self {
            id: v.id,
            jv_number: v.jv_number,
            branch: v.branch,
            transaction_date: v.transaction_date.to_rfc3339(),
            debit_account: VoucherSideResponse {
                party_type: v.debit_account.party_type,
                party_id: v.debit_account.party_id,
                account_name: v.debit_account.account_name,
            },
            credit_account: VoucherSideResponse {
                party_type: v.credit_account.party_type,
                party_id: v.credit_account.party_id,
                account_name: v.credit_account.account_name,
            },
            amount: v.amount,
            narration: v.narration,
            active: v.active,
            entered_by: v.entered_by,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}
