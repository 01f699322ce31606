use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    CommissionBasis, CommissionLedgerEntry, CommissionRule, CommissionStatus, ExecutiveRole,
    RuleKind, RuleScope, TriggerEvent,
};
use crate::services::CommissionSummary;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommissionRuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub applies_to_role: ExecutiveRole,
    pub kind: RuleKind,
    #[validate(range(min = 0.01))]
    pub value: f64,
    pub trigger_event: TriggerEvent,
    pub basis: CommissionBasis,
    /// Omitted = global rule; present = scoped to one project.
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommissionRuleRequest {
    pub value: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CommissionRuleResponse {
    pub id: String,
    pub name: String,
    pub applies_to_role: ExecutiveRole,
    pub kind: RuleKind,
    pub value: f64,
    pub trigger_event: TriggerEvent,
    pub basis: CommissionBasis,
    pub project_id: Option<String>,
    pub active: bool,
    pub created_at: String,
}

impl From<CommissionRule> for CommissionRuleResponse {
    fn from(r: CommissionRule) -> Self {
        let project_id = match &r.scope {
            RuleScope::Global => None,
            RuleScope::Project(id) => Some(id.clone()),
        };
        Self {
            id: r.id,
            name: r.name,
            applies_to_role: r.applies_to_role,
            kind: r.kind,
            value: r.value,
            trigger_event: r.trigger_event,
            basis: r.basis,
            project_id,
            active: r.active,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommissionEntryResponse {
    pub id: String,
    pub executive_id: String,
    pub rule_id: Option<String>,
    pub customer_id: Option<String>,
    pub amount: f64,
    pub status: CommissionStatus,
    pub reference_transaction_id: Option<String>,
    pub description: String,
    pub generated_at: String,
    pub paid_at: Option<String>,
}

impl From<CommissionLedgerEntry> for CommissionEntryResponse {
    fn from(e: CommissionLedgerEntry) -> Self {
        Self {
            id: e.id,
            executive_id: e.executive_id,
            rule_id: e.rule_id,
            customer_id: e.customer_id,
            amount: e.amount,
            status: e.status,
            reference_transaction_id: e.reference_transaction_id,
            description: e.description,
            generated_at: e.generated_at.to_rfc3339(),
            paid_at: e.paid_at.map(|d| d.to_chrono().to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutiveCommissionLedgerResponse {
    pub executive_id: String,
    pub summary: CommissionSummary,
    pub entries: Vec<CommissionEntryResponse>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PayCommissionRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayCommissionResponse {
    pub executive_id: String,
    pub amount: f64,
    pub affected_entry_ids: Vec<String>,
}
