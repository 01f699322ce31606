//! Commission rules and the per-executive commission ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::executive::ExecutiveRole;
use super::money::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    DealClosed,
    PaymentReceived,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealClosed => "deal_closed",
            Self::PaymentReceived => "payment_received",
        }
    }
}

/// What the commission is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionBasis {
    FullDealValue,
    ReceivedAmount,
}

impl CommissionBasis {
    /// Pick the basis amount out of the trigger context.
    pub fn amount(&self, deal_value: f64, received_amount: f64) -> f64 {
        match self {
            Self::FullDealValue => deal_value,
            Self::ReceivedAmount => received_amount,
        }
    }
}

/// Rule applicability: every project, or one project only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "project_id", rename_all = "lowercase")]
pub enum RuleScope {
    Global,
    Project(String),
}

impl RuleScope {
    pub fn matches(&self, project_id: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Project(id) => id == project_id,
        }
    }
}

/// Commission rule. Edits only affect future accruals; entries already
/// written keep the amounts they were computed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionRule {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub applies_to_role: ExecutiveRole,
    pub kind: RuleKind,
    /// Percent of the basis for `Percentage`, flat amount for `Fixed`.
    pub value: f64,
    pub trigger_event: TriggerEvent,
    pub basis: CommissionBasis,
    pub scope: RuleScope,
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl CommissionRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        applies_to_role: ExecutiveRole,
        kind: RuleKind,
        value: f64,
        trigger_event: TriggerEvent,
        basis: CommissionBasis,
        scope: RuleScope,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            applies_to_role,
            kind,
            value,
            trigger_event,
            basis,
            scope,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Commission amount for a basis amount under this rule.
    pub fn commission_for(&self, basis_amount: f64) -> f64 {
        match self.kind {
            RuleKind::Percentage => round2(basis_amount * self.value / 100.0),
            RuleKind::Fixed => self.value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Earned,
    Paid,
}

/// One accrual (or split remainder) on an executive's commission ledger.
///
/// State machine: `earned -> paid` and nothing else. A partial payout
/// shrinks the consumed entry, marks it paid, and appends a fresh `earned`
/// sibling carrying the leftover with the ORIGINAL `generated_at` so the
/// oldest-first payout order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionLedgerEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub executive_id: String,
    pub rule_id: Option<String>,
    pub customer_id: Option<String>,
    pub amount: f64,
    pub status: CommissionStatus,
    pub reference_transaction_id: Option<String>,
    pub description: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub generated_at: DateTime<Utc>,
    pub paid_at: Option<mongodb::bson::DateTime>,
}

impl CommissionLedgerEntry {
    pub fn earned(
        executive_id: String,
        rule_id: Option<String>,
        customer_id: Option<String>,
        amount: f64,
        reference_transaction_id: Option<String>,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            executive_id,
            rule_id,
            customer_id,
            amount,
            status: CommissionStatus::Earned,
            reference_transaction_id,
            description,
            generated_at: Utc::now(),
            paid_at: None,
        }
    }

    /// Build the leftover sibling produced by a partial payout. Linkage and
    /// `generated_at` come from the consumed entry.
    pub fn split_remainder(&self, leftover: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            executive_id: self.executive_id.clone(),
            rule_id: self.rule_id.clone(),
            customer_id: self.customer_id.clone(),
            amount: leftover,
            status: CommissionStatus::Earned,
            reference_transaction_id: self.reference_transaction_id.clone(),
            description: format!("{} (Remaining Balance)", self.description),
            generated_at: self.generated_at,
            paid_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: RuleKind, value: f64, basis: CommissionBasis) -> CommissionRule {
        CommissionRule::new(
            "test rule".into(),
            ExecutiveRole::SalesExecutive,
            kind,
            value,
            TriggerEvent::DealClosed,
            basis,
            RuleScope::Global,
        )
    }

    #[test]
    fn percentage_rule_takes_share_of_basis() {
        let r = rule(RuleKind::Percentage, 2.5, CommissionBasis::FullDealValue);
        assert_eq!(r.commission_for(500_000.0), 12_500.0);
    }

    #[test]
    fn fixed_rule_ignores_basis() {
        let r = rule(RuleKind::Fixed, 15_000.0, CommissionBasis::FullDealValue);
        assert_eq!(r.commission_for(500_000.0), 15_000.0);
        assert_eq!(r.commission_for(0.0), 15_000.0);
    }

    #[test]
    fn basis_picks_the_right_context_amount() {
        assert_eq!(
            CommissionBasis::FullDealValue.amount(500_000.0, 50_000.0),
            500_000.0
        );
        assert_eq!(
            CommissionBasis::ReceivedAmount.amount(500_000.0, 50_000.0),
            50_000.0
        );
    }

    #[test]
    fn scope_matching_is_explicit() {
        assert!(RuleScope::Global.matches("any-project"));
        assert!(RuleScope::Project("p1".into()).matches("p1"));
        assert!(!RuleScope::Project("p1".into()).matches("p2"));
    }

    #[test]
    fn split_remainder_keeps_linkage_and_aging() {
        let original = CommissionLedgerEntry::earned(
            "exec".into(),
            Some("rule".into()),
            Some("cust".into()),
            2000.0,
            Some("txn".into()),
            "Commission on booking".into(),
        );
        let sibling = original.split_remainder(500.0);
        assert_eq!(sibling.amount, 500.0);
        assert_eq!(sibling.status, CommissionStatus::Earned);
        assert_eq!(sibling.generated_at, original.generated_at);
        assert_eq!(sibling.rule_id, original.rule_id);
        assert_eq!(sibling.customer_id, original.customer_id);
        assert_ne!(sibling.id, original.id);
        assert!(sibling.description.contains("Remaining Balance"));
    }
}
