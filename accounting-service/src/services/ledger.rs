//! Ledger posting service.
//!
//! Appends signed debit/credit rows to the per-party running-balance ledger.
//! Each append reads the most recent active row for the party and inserts
//! the next one inside a single session transaction, so two concurrent
//! posters cannot both derive the new balance from the same stale row.

use backoffice_core::error::AppError;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::doc,
    options::{FindOneOptions, FindOptions},
    ClientSession,
};

use crate::models::ledger_entry::next_balance;
use crate::models::{LedgerEntry, PartyType, ReferenceType};
use crate::services::MongoDb;
use futures::TryStreamExt;

/// Input for one ledger append. `transaction_date` defaults to now.
#[derive(Debug, Clone)]
pub struct PostLedgerEntry {
    pub party_type: PartyType,
    pub party_id: String,
    pub debit: f64,
    pub credit: f64,
    pub description: String,
    pub reference_type: ReferenceType,
    pub reference_id: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Rejects postings that move no money at all, and negative amounts.
fn validate_amounts(debit: f64, credit: f64) -> Result<(), AppError> {
    if debit < 0.0 || credit < 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Debit and credit amounts cannot be negative"
        )));
    }
    if debit == 0.0 && credit == 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Either a debit or a credit amount is required"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LedgerService {
    db: MongoDb,
}

impl LedgerService {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// Append one row for the party, in its own session transaction.
    pub async fn post(
        &self,
        input: PostLedgerEntry,
        entered_by: &str,
    ) -> Result<LedgerEntry, AppError> {
        validate_amounts(input.debit, input.credit)?;

        let mut session = self.db.client().start_session(None).await?;
        session.start_transaction(None).await?;

        match self.post_in_session(&mut session, input, entered_by).await {
            Ok(entry) => {
                session.commit_transaction().await?;
                Ok(entry)
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                Err(e)
            }
        }
    }

    /// Append one row inside the caller's session. The previous balance is
    /// read through the same session, so the voucher poster sees a
    /// consistent snapshot for both of its sides.
    pub async fn post_in_session(
        &self,
        session: &mut ClientSession,
        input: PostLedgerEntry,
        entered_by: &str,
    ) -> Result<LedgerEntry, AppError> {
        validate_amounts(input.debit, input.credit)?;

        let previous = self
            .latest_balance_in_session(session, input.party_type, &input.party_id)
            .await?;
        let balance = next_balance(previous, input.debit, input.credit);

        let entry = LedgerEntry::new(
            input.party_type,
            input.party_id,
            input.debit,
            input.credit,
            balance,
            input.description,
            input.reference_type,
            input.reference_id,
            input.transaction_date.unwrap_or_else(Utc::now),
            entered_by.to_string(),
        );

        self.db
            .ledgers()
            .insert_one_with_session(&entry, None, session)
            .await?;

        metrics::counter!("ledger_entries_posted_total").increment(1);
        tracing::info!(
            entry_id = %entry.id,
            party_type = %entry.party_type,
            party_id = %entry.party_id,
            debit = entry.debit,
            credit = entry.credit,
            balance = entry.balance,
            "Ledger entry posted"
        );

        Ok(entry)
    }

    /// Balance of the most recent active row for the party, 0 for an empty
    /// ledger. Ordered by transaction date, then insertion order.
    async fn latest_balance_in_session(
        &self,
        session: &mut ClientSession,
        party_type: PartyType,
        party_id: &str,
    ) -> Result<f64, AppError> {
        let options = FindOneOptions::builder()
            .sort(doc! { "transaction_date": -1, "created_at": -1 })
            .build();
        let last = self
            .db
            .ledgers()
            .find_one_with_session(
                doc! {
                    "party_type": party_type.as_str(),
                    "party_id": party_id,
                    "active": true
                },
                options,
                session,
            )
            .await?;

        Ok(last.map(|e| e.balance).unwrap_or(0.0))
    }

    /// Active entries for a party, newest first, plus the current balance
    /// (the latest active row's balance, 0 for an empty ledger).
    pub async fn party_ledger(
        &self,
        party_type: PartyType,
        party_id: &str,
    ) -> Result<(Vec<LedgerEntry>, f64), AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "transaction_date": -1, "created_at": -1 })
            .build();
        let cursor = self
            .db
            .ledgers()
            .find(
                doc! {
                    "party_type": party_type.as_str(),
                    "party_id": party_id,
                    "active": true
                },
                options,
            )
            .await?;
        let entries: Vec<LedgerEntry> = cursor.try_collect().await?;

        let current_balance = entries.first().map(|e| e.balance).unwrap_or(0.0);
        Ok((entries, current_balance))
    }

    /// Soft-delete one entry. Later rows keep the balances they were posted
    /// with; there is no repair pass.
    pub async fn deactivate(&self, entry_id: &str) -> Result<(), AppError> {
        let result = self
            .db
            .ledgers()
            .update_one(
                doc! { "_id": entry_id, "active": true },
                doc! { "$set": { "active": false } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Ledger entry not found or already deleted"
            )));
        }

        tracing::info!(entry_id = %entry_id, "Ledger entry deactivated");
        Ok(())
    }

    /// Soft-delete every row produced by one source document (both sides of
    /// a voucher). Joins the caller's session.
    pub async fn deactivate_by_reference_in_session(
        &self,
        session: &mut ClientSession,
        reference_type: ReferenceType,
        reference_id: &str,
    ) -> Result<u64, AppError> {
        let result = self
            .db
            .ledgers()
            .update_many_with_session(
                doc! {
                    "reference_type": reference_type.as_str(),
                    "reference_id": reference_id,
                    "active": true
                },
                doc! { "$set": { "active": false } },
                None,
                session,
            )
            .await?;
        Ok(result.modified_count)
    }
}
