use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use chrono::Utc;
use validator::Validate;

use crate::dtos::{CreateJournalVoucherRequest, JournalVoucherResponse, VoucherListParams};
use crate::middleware::ActorContext;
use crate::models::VoucherSide;
use crate::services::CreateJournalVoucher;
use crate::startup::AppState;

pub async fn create_journal_voucher(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(payload): Json<CreateJournalVoucherRequest>,
) -> Result<(StatusCode, Json<JournalVoucherResponse>), AppError> {
    payload.validate()?;

    let voucher = state
        .journal
        .create(
            CreateJournalVoucher {
                branch: payload.branch,
                transaction_date: payload.transaction_date.unwrap_or_else(Utc::now),
                debit_account: VoucherSide {
                    party_type: payload.debit_account.party_type,
                    party_id: payload.debit_account.party_id,
                    account_name: payload.debit_account.account_name,
                },
                credit_account: VoucherSide {
                    party_type: payload.credit_account.party_type,
                    party_id: payload.credit_account.party_id,
                    account_name: payload.credit_account.account_name,
                },
                amount: payload.amount,
                narration: payload.narration,
            },
            &actor.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(JournalVoucherResponse::from(voucher)),
    ))
}

pub async fn list_journal_vouchers(
    State(state): State<AppState>,
    Query(params): Query<VoucherListParams>,
) -> Result<Json<Vec<JournalVoucherResponse>>, AppError> {
    let vouchers = state.journal.list(params.include_inactive).await?;
    Ok(Json(
        vouchers
            .into_iter()
            .map(JournalVoucherResponse::from)
            .collect(),
    ))
}

pub async fn get_journal_voucher(
    State(state): State<AppState>,
    Path(voucher_id): Path<String>,
) -> Result<Json<JournalVoucherResponse>, AppError> {
    let voucher = state.journal.get(&voucher_id).await?;
    Ok(Json(JournalVoucherResponse::from(voucher)))
}

/// Soft-delete the voucher together with both of its ledger rows.
pub async fn delete_journal_voucher(
    State(state): State<AppState>,
    Path(voucher_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.journal.deactivate(&voucher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
