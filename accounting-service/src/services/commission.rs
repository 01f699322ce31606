//! Commission engine.
//!
//! Accrual: a trigger event (deal closed, payment received) is matched
//! against the active rules for the executive's role and the project scope;
//! each matching rule appends one `earned` entry to the commission ledger.
//!
//! Payout: consumes `earned` entries oldest-first. An entry fully covered by
//! the payout flips to `paid`; the entry the payout runs out inside is
//! shrunk to the amount actually paid and a fresh `earned` sibling carries
//! the leftover, keeping the original `generated_at`. The earned+paid total
//! is conserved by every payout.

use backoffice_core::error::AppError;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions};

use crate::models::money::round2;
use crate::models::{CommissionLedgerEntry, CommissionRule, CommissionStatus, TriggerEvent};
use crate::services::MongoDb;

/// Amounts are 2-decimal money; comparisons tolerate float noise below a
/// tenth of a paisa.
const MONEY_EPSILON: f64 = 1e-6;

/// Context handed to the engine by the booking/payment flows.
#[derive(Debug, Clone, Default)]
pub struct CommissionTrigger {
    pub executive_id: Option<String>,
    pub project_id: String,
    pub customer_id: Option<String>,
    pub deal_value: f64,
    pub received_amount: f64,
    pub transaction_id: Option<String>,
}

/// Per-executive aggregates for the commission ledger view.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CommissionSummary {
    pub total_accrued: f64,
    pub total_paid: f64,
    pub pending: f64,
}

/// One step of a payout plan, indexed into the oldest-first earned list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayoutStep {
    /// The entry is consumed whole.
    Full { index: usize },
    /// The payout runs out inside this entry: `paid` is taken now,
    /// `leftover` becomes a new earned sibling.
    Split { index: usize, paid: f64, leftover: f64 },
}

/// Greedy oldest-first allocation of `amount` across earned entry amounts.
/// The caller guarantees `amount` does not exceed the sum of `amounts`.
pub fn plan_payout(amounts: &[f64], amount: f64) -> Vec<PayoutStep> {
    let mut remaining = amount;
    let mut steps = Vec::new();

    for (index, &entry_amount) in amounts.iter().enumerate() {
        if remaining <= MONEY_EPSILON {
            break;
        }
        if entry_amount <= remaining + MONEY_EPSILON {
            steps.push(PayoutStep::Full { index });
            remaining = round2(remaining - entry_amount);
        } else {
            steps.push(PayoutStep::Split {
                index,
                paid: round2(remaining),
                leftover: round2(entry_amount - remaining),
            });
            remaining = 0.0;
        }
    }

    steps
}

#[derive(Clone)]
pub struct CommissionEngine {
    db: MongoDb,
}

impl CommissionEngine {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// Accrue commissions for a trigger event. Silently does nothing when no
    /// executive is attached or no rule matches; callers never treat an
    /// unmatched event as a failure.
    pub async fn process(
        &self,
        trigger: TriggerEvent,
        ctx: CommissionTrigger,
    ) -> Result<Vec<CommissionLedgerEntry>, AppError> {
        let Some(executive_id) = ctx.executive_id.as_deref() else {
            return Ok(Vec::new());
        };

        let executive = self
            .db
            .executives()
            .find_one(doc! { "_id": executive_id, "active": true }, None)
            .await?;
        let Some(executive) = executive else {
            tracing::warn!(
                executive_id = %executive_id,
                "Commission trigger references an unknown executive, skipping accrual"
            );
            return Ok(Vec::new());
        };

        let filter = doc! {
            "applies_to_role": executive.role.as_str(),
            "trigger_event": trigger.as_str(),
            "active": true,
            "$or": [
                { "scope.kind": "global" },
                { "scope.kind": "project", "scope.project_id": &ctx.project_id },
            ],
        };
        let cursor = self.db.commission_rules().find(filter, None).await?;
        let rules: Vec<CommissionRule> = cursor.try_collect().await?;

        let mut created = Vec::new();
        for rule in rules {
            if !rule.scope.matches(&ctx.project_id) {
                continue;
            }
            let basis_amount = rule.basis.amount(ctx.deal_value, ctx.received_amount);
            let amount = rule.commission_for(basis_amount);
            if amount <= 0.0 {
                continue;
            }

            let description = match trigger {
                TriggerEvent::DealClosed => format!("Commission on deal closure ({})", rule.name),
                TriggerEvent::PaymentReceived => {
                    format!("Commission on payment received ({})", rule.name)
                }
            };
            let entry = CommissionLedgerEntry::earned(
                executive.id.clone(),
                Some(rule.id.clone()),
                ctx.customer_id.clone(),
                amount,
                ctx.transaction_id.clone(),
                description,
            );

            self.db
                .commission_ledgers()
                .insert_one(&entry, None)
                .await?;

            metrics::counter!("commission_entries_accrued_total").increment(1);
            tracing::info!(
                entry_id = %entry.id,
                executive_id = %executive.id,
                rule = %rule.name,
                amount = entry.amount,
                "Commission accrued"
            );
            created.push(entry);
        }

        Ok(created)
    }

    /// Pay out `amount` against the executive's pending commissions.
    /// Returns the ids of every entry touched, including the split sibling.
    pub async fn pay(
        &self,
        executive_id: &str,
        amount: f64,
        remarks: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        if amount <= 0.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Payout amount must be greater than zero"
            )));
        }

        self.db
            .executives()
            .find_one(doc! { "_id": executive_id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Executive not found")))?;

        let mut session = self.db.client().start_session(None).await?;
        session.start_transaction(None).await?;

        let result = self
            .pay_in_session(&mut session, executive_id, amount, remarks)
            .await;
        match result {
            Ok(ids) => {
                session.commit_transaction().await?;
                metrics::counter!("commission_payouts_total").increment(1);
                tracing::info!(
                    executive_id = %executive_id,
                    amount = amount,
                    entries = ids.len(),
                    "Commission payout recorded"
                );
                Ok(ids)
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                Err(e)
            }
        }
    }

    async fn pay_in_session(
        &self,
        session: &mut mongodb::ClientSession,
        executive_id: &str,
        amount: f64,
        remarks: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "generated_at": 1 })
            .build();
        let mut cursor = self
            .db
            .commission_ledgers()
            .find_with_session(
                doc! { "executive_id": executive_id, "status": "earned" },
                options,
                session,
            )
            .await?;
        let earned: Vec<CommissionLedgerEntry> = cursor.stream(session).try_collect().await?;

        let pending: f64 = round2(earned.iter().map(|e| e.amount).sum());
        if amount > pending + MONEY_EPSILON {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Payout amount {} exceeds pending commission balance of {}",
                amount,
                pending
            )));
        }

        let amounts: Vec<f64> = earned.iter().map(|e| e.amount).collect();
        let steps = plan_payout(&amounts, amount);

        let paid_at = mongodb::bson::DateTime::from_chrono(Utc::now());
        let note = match remarks {
            Some(r) if !r.is_empty() => format!(" | Paid: {}", r),
            _ => " | Paid".to_string(),
        };

        let mut affected = Vec::new();
        for step in steps {
            match step {
                PayoutStep::Full { index } => {
                    let entry = &earned[index];
                    self.db
                        .commission_ledgers()
                        .update_one_with_session(
                            doc! { "_id": &entry.id },
                            doc! { "$set": {
                                "status": "paid",
                                "paid_at": paid_at,
                                "description": format!("{}{}", entry.description, note),
                            }},
                            None,
                            session,
                        )
                        .await?;
                    affected.push(entry.id.clone());
                }
                PayoutStep::Split { index, paid, leftover } => {
                    let entry = &earned[index];
                    self.db
                        .commission_ledgers()
                        .update_one_with_session(
                            doc! { "_id": &entry.id },
                            doc! { "$set": {
                                "amount": paid,
                                "status": "paid",
                                "paid_at": paid_at,
                                "description": format!("{}{}", entry.description, note),
                            }},
                            None,
                            session,
                        )
                        .await?;
                    affected.push(entry.id.clone());

                    let sibling = entry.split_remainder(leftover);
                    self.db
                        .commission_ledgers()
                        .insert_one_with_session(&sibling, None, session)
                        .await?;
                    affected.push(sibling.id);
                }
            }
        }

        Ok(affected)
    }

    /// Full commission ledger for an executive, newest first, with the
    /// accrued/paid/pending aggregates.
    pub async fn executive_ledger(
        &self,
        executive_id: &str,
    ) -> Result<(Vec<CommissionLedgerEntry>, CommissionSummary), AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "generated_at": -1 })
            .build();
        let cursor = self
            .db
            .commission_ledgers()
            .find(doc! { "executive_id": executive_id }, options)
            .await?;
        let entries: Vec<CommissionLedgerEntry> = cursor.try_collect().await?;

        let total_accrued = round2(entries.iter().map(|e| e.amount).sum());
        let total_paid = round2(
            entries
                .iter()
                .filter(|e| e.status == CommissionStatus::Paid)
                .map(|e| e.amount)
                .sum(),
        );
        let summary = CommissionSummary {
            total_accrued,
            total_paid,
            pending: round2(total_accrued - total_paid),
        };

        Ok((entries, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_consumed(amounts: &[f64], steps: &[PayoutStep]) -> f64 {
        steps
            .iter()
            .map(|s| match *s {
                PayoutStep::Full { index } => amounts[index],
                PayoutStep::Split { paid, .. } => paid,
            })
            .sum()
    }

    #[test]
    fn payout_consumes_oldest_first_and_splits_the_last() {
        // The worked scenario: 1000, 2000, 1500 pending; pay 2500.
        let amounts = [1000.0, 2000.0, 1500.0];
        let steps = plan_payout(&amounts, 2500.0);

        assert_eq!(
            steps,
            vec![
                PayoutStep::Full { index: 0 },
                PayoutStep::Split {
                    index: 1,
                    paid: 1500.0,
                    leftover: 500.0
                },
            ]
        );
        // Earned afterwards: the 500 leftover plus the untouched 1500.
        assert_eq!(total_consumed(&amounts, &steps), 2500.0);
    }

    #[test]
    fn exact_cover_flips_entries_without_a_split() {
        let amounts = [1000.0, 2000.0];
        let steps = plan_payout(&amounts, 3000.0);
        assert_eq!(
            steps,
            vec![PayoutStep::Full { index: 0 }, PayoutStep::Full { index: 1 }]
        );
    }

    #[test]
    fn split_conserves_the_entry_amount() {
        let amounts = [1000.0];
        let steps = plan_payout(&amounts, 250.0);
        match steps[0] {
            PayoutStep::Split { paid, leftover, .. } => {
                assert_eq!(paid, 250.0);
                assert_eq!(leftover, 750.0);
                assert_eq!(paid + leftover, amounts[0]);
            }
            _ => panic!("expected a split"),
        }
    }

    #[test]
    fn payout_never_overdraws_the_plan() {
        let amounts = [100.0, 100.0, 100.0];
        for pay in [50.0, 100.0, 150.0, 250.0, 300.0] {
            let steps = plan_payout(&amounts, pay);
            assert!((total_consumed(&amounts, &steps) - pay).abs() < 1e-6);
        }
    }

    #[test]
    fn fractional_amounts_round_to_money() {
        let amounts = [33.33, 33.33, 33.34];
        let steps = plan_payout(&amounts, 50.0);
        assert_eq!(steps.len(), 2);
        match steps[1] {
            PayoutStep::Split { paid, leftover, .. } => {
                assert_eq!(paid, 16.67);
                assert_eq!(leftover, 16.66);
            }
            _ => panic!("expected a split"),
        }
    }
}
