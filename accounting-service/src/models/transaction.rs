use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    BankTransfer,
    Upi,
}

/// Immutable record of one payment/receipt event against a customer.
///
/// `balance_at_time` is a snapshot of the customer's outstanding balance
/// after this payment was applied; it is never re-derived later. A reversal
/// only flips `reversed` and appends a compensating ledger row; the
/// original record stays as written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub transaction_date: DateTime<Utc>,
    pub balance_at_time: f64,
    pub remarks: Option<String>,
    pub reversed: bool,
    pub entered_by: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl PaymentTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: String,
        amount: f64,
        method: PaymentMethod,
        reference_no: Option<String>,
        transaction_date: DateTime<Utc>,
        balance_at_time: f64,
        remarks: Option<String>,
        entered_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            amount,
            method,
            reference_no,
            transaction_date,
            balance_at_time,
            remarks,
            reversed: false,
            entered_by,
            created_at: Utc::now(),
        }
    }
}
