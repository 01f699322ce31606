//! Journal-voucher poster.
//!
//! A voucher and its two ledger rows (debit side, credit side) are written
//! in one multi-document transaction. If any write fails the session is
//! aborted and nothing is visible. Voucher numbers come from an atomic
//! counter document, so concurrent posters can never mint the same number.

use backoffice_core::error::AppError;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    ClientSession,
};

use crate::models::{JournalVoucher, ReferenceType, VoucherSide};
use crate::services::{LedgerService, MongoDb, PostLedgerEntry};

const JV_SEQUENCE: &str = "journal_voucher";

#[derive(Debug, Clone)]
pub struct CreateJournalVoucher {
    pub branch: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub debit_account: VoucherSide,
    pub credit_account: VoucherSide,
    pub amount: f64,
    pub narration: String,
}

#[derive(Clone)]
pub struct JournalService {
    db: MongoDb,
    ledger: LedgerService,
}

impl JournalService {
    pub fn new(db: MongoDb, ledger: LedgerService) -> Self {
        Self { db, ledger }
    }

    /// Post a voucher. Validation runs before the transaction; everything
    /// after `start_transaction` either commits whole or aborts whole.
    pub async fn create(
        &self,
        input: CreateJournalVoucher,
        entered_by: &str,
    ) -> Result<JournalVoucher, AppError> {
        if input.amount <= 0.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Voucher amount must be greater than zero"
            )));
        }
        if input.debit_account.party_type == input.credit_account.party_type
            && input.debit_account.party_id == input.credit_account.party_id
        {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Debit and credit sides must reference different parties"
            )));
        }
        self.ensure_party_exists(&input.debit_account).await?;
        self.ensure_party_exists(&input.credit_account).await?;

        let mut session = self.db.client().start_session(None).await?;
        session.start_transaction(None).await?;

        match self.create_in_session(&mut session, &input, entered_by).await {
            Ok(voucher) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(|e| AppError::TransactionAborted(e.into()))?;

                metrics::counter!("journal_vouchers_posted_total").increment(1);
                tracing::info!(
                    jv_number = %voucher.jv_number,
                    amount = voucher.amount,
                    "Journal voucher posted"
                );
                Ok(voucher)
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                // Database failures mid-voucher become abort errors; the
                // caller may retry since nothing was committed.
                Err(match e {
                    AppError::DatabaseError(inner) => AppError::TransactionAborted(inner),
                    other => other,
                })
            }
        }
    }

    async fn create_in_session(
        &self,
        session: &mut ClientSession,
        input: &CreateJournalVoucher,
        entered_by: &str,
    ) -> Result<JournalVoucher, AppError> {
        let seq = self.next_sequence(session, JV_SEQUENCE).await?;
        let voucher = JournalVoucher::new(
            JournalVoucher::format_number(seq),
            input.branch.clone(),
            input.transaction_date,
            input.debit_account.clone(),
            input.credit_account.clone(),
            input.amount,
            input.narration.clone(),
            entered_by.to_string(),
        );

        self.db
            .journal_vouchers()
            .insert_one_with_session(&voucher, None, session)
            .await?;

        self.ledger
            .post_in_session(
                session,
                PostLedgerEntry {
                    party_type: input.debit_account.party_type,
                    party_id: input.debit_account.party_id.clone(),
                    debit: input.amount,
                    credit: 0.0,
                    description: format!("{} ({})", input.narration, voucher.jv_number),
                    reference_type: ReferenceType::JournalVoucher,
                    reference_id: Some(voucher.id.clone()),
                    transaction_date: Some(input.transaction_date),
                },
                entered_by,
            )
            .await?;

        self.ledger
            .post_in_session(
                session,
                PostLedgerEntry {
                    party_type: input.credit_account.party_type,
                    party_id: input.credit_account.party_id.clone(),
                    debit: 0.0,
                    credit: input.amount,
                    description: format!("{} ({})", input.narration, voucher.jv_number),
                    reference_type: ReferenceType::JournalVoucher,
                    reference_id: Some(voucher.id.clone()),
                    transaction_date: Some(input.transaction_date),
                },
                entered_by,
            )
            .await?;

        Ok(voucher)
    }

    /// Next value of a named sequence, atomically.
    async fn next_sequence(
        &self,
        session: &mut ClientSession,
        name: &str,
    ) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .db
            .counters()
            .find_one_and_update_with_session(
                doc! { "_id": name },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
                session,
            )
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!("Counter upsert returned no document"))
            })?;
        Ok(counter.seq)
    }

    async fn ensure_party_exists(&self, side: &VoucherSide) -> Result<(), AppError> {
        if !self.db.party_exists(side.party_type, &side.party_id).await? {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "{} {} referenced by the voucher does not exist",
                side.party_type,
                side.party_id
            )));
        }
        Ok(())
    }

    /// Vouchers newest first.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<JournalVoucher>, AppError> {
        let filter = if include_inactive {
            doc! {}
        } else {
            doc! { "active": true }
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.db.journal_vouchers().find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get(&self, id: &str) -> Result<JournalVoucher, AppError> {
        self.db
            .journal_vouchers()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Journal voucher not found")))
    }

    /// Soft-delete the voucher and both of its ledger rows together.
    pub async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let voucher = self.get(id).await?;
        if !voucher.active {
            return Ok(());
        }

        let mut session = self.db.client().start_session(None).await?;
        session.start_transaction(None).await?;

        let result: Result<(), AppError> = async {
            self.db
                .journal_vouchers()
                .update_one_with_session(
                    doc! { "_id": &voucher.id },
                    doc! { "$set": { "active": false } },
                    None,
                    &mut session,
                )
                .await?;
            self.ledger
                .deactivate_by_reference_in_session(
                    &mut session,
                    ReferenceType::JournalVoucher,
                    &voucher.id,
                )
                .await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(|e| AppError::TransactionAborted(e.into()))?;
                tracing::info!(jv_number = %voucher.jv_number, "Journal voucher deactivated");
                Ok(())
            }
            Err(e) => {
                session.abort_transaction().await.ok();
                Err(match e {
                    AppError::DatabaseError(inner) => AppError::TransactionAborted(inner),
                    other => other,
                })
            }
        }
    }
}
