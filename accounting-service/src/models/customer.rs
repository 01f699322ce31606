use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::round2;

/// A customer booked against exactly one plot. `project_id` and `plot_id`
/// are fixed at creation; `balance_amount` is always `deal_value -
/// paid_amount` and is recomputed on every write that touches either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub project_id: String,
    pub plot_id: String,
    pub executive_id: Option<String>,
    pub deal_value: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        phone: String,
        email: Option<String>,
        address: Option<String>,
        project_id: String,
        plot_id: String,
        executive_id: Option<String>,
        deal_value: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            email,
            address,
            project_id,
            plot_id,
            executive_id,
            deal_value,
            paid_amount: 0.0,
            balance_amount: deal_value,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-derive the outstanding balance from the deal and paid totals.
    pub fn recompute_balance(&mut self) {
        self.balance_amount = round2(self.deal_value - self.paid_amount);
    }

    /// Apply a received amount (negative for a reversal) and re-derive.
    pub fn apply_payment(&mut self, amount: f64) {
        self.paid_amount = round2(self.paid_amount + amount);
        self.recompute_balance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer::new(
            "Asha Patil".into(),
            "9820000001".into(),
            None,
            None,
            "proj".into(),
            "plot".into(),
            None,
            750_000.0,
        )
    }

    #[test]
    fn new_customer_owes_the_full_deal() {
        let c = sample();
        assert_eq!(c.paid_amount, 0.0);
        assert_eq!(c.balance_amount, 750_000.0);
    }

    #[test]
    fn balance_tracks_payments_and_reversals() {
        let mut c = sample();
        c.apply_payment(200_000.0);
        assert_eq!(c.paid_amount, 200_000.0);
        assert_eq!(c.balance_amount, 550_000.0);

        c.apply_payment(-200_000.0);
        assert_eq!(c.paid_amount, 0.0);
        assert_eq!(c.balance_amount, 750_000.0);
    }

    #[test]
    fn recompute_balance_restores_the_invariant() {
        let mut c = sample();
        c.deal_value = 800_000.0;
        c.paid_amount = 120_000.0;
        c.recompute_balance();
        assert_eq!(c.balance_amount, 680_000.0);
    }
}
