use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use validator::Validate;

use crate::dtos::{CreateLedgerEntryRequest, LedgerEntryResponse, PartyLedgerResponse};
use crate::middleware::ActorContext;
use crate::models::{PartyType, ReferenceType};
use crate::services::PostLedgerEntry;
use crate::startup::AppState;

/// Manual ledger entry, outside the booking/payment/voucher flows.
pub async fn create_ledger_entry(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(payload): Json<CreateLedgerEntryRequest>,
) -> Result<(StatusCode, Json<LedgerEntryResponse>), AppError> {
    payload.validate()?;

    if !state
        .db
        .party_exists(payload.party_type, &payload.party_id)
        .await?
    {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "{} {} not found",
            payload.party_type,
            payload.party_id
        )));
    }

    let entry = state
        .ledger
        .post(
            PostLedgerEntry {
                party_type: payload.party_type,
                party_id: payload.party_id,
                debit: payload.debit,
                credit: payload.credit,
                description: payload.description,
                reference_type: ReferenceType::Manual,
                reference_id: None,
                transaction_date: payload.transaction_date,
            },
            &actor.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(LedgerEntryResponse::from(entry))))
}

/// Per-party ledger: active entries newest first plus the current balance.
pub async fn get_party_ledger(
    State(state): State<AppState>,
    Path((party_type, party_id)): Path<(String, String)>,
) -> Result<Json<PartyLedgerResponse>, AppError> {
    let party_type: PartyType = party_type
        .parse()
        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?;

    if !state.db.party_exists(party_type, &party_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "{} {} not found",
            party_type,
            party_id
        )));
    }

    let (entries, current_balance) = state.ledger.party_ledger(party_type, &party_id).await?;
    Ok(Json(PartyLedgerResponse {
        party_type,
        party_id,
        current_balance,
        entries: entries.into_iter().map(LedgerEntryResponse::from).collect(),
    }))
}

/// Soft delete. Balances of later rows are left as posted.
pub async fn delete_ledger_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.ledger.deactivate(&entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
