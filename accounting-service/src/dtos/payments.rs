use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{PaymentMethod, PaymentTransaction};

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
    pub customer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub transaction_date: String,
    pub balance_at_time: f64,
    pub remarks: Option<String>,
    pub reversed: bool,
    pub entered_by: String,
    pub created_at: String,
}

impl From<PaymentTransaction> for TransactionResponse {
    fn from(t: PaymentTransaction) -> Self {
        Self {
            id: t.id,
            customer_id: t.customer_id,
            amount: t.amount,
            method: t.method,
            reference_no: t.reference_no,
            transaction_date: t.transaction_date.to_rfc3339(),
            balance_at_time: t.balance_at_time,
            remarks: t.remarks,
            reversed: t.reversed,
            entered_by: t.entered_by,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}
