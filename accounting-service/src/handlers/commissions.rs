use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use mongodb::bson::doc;
use validator::Validate;

use crate::dtos::{
    CommissionEntryResponse, ExecutiveCommissionLedgerResponse, PayCommissionRequest,
    PayCommissionResponse,
};
use crate::startup::AppState;

/// Commission ledger for one executive with accrued/paid/pending totals.
pub async fn get_executive_commissions(
    State(state): State<AppState>,
    Path(executive_id): Path<String>,
) -> Result<Json<ExecutiveCommissionLedgerResponse>, AppError> {
    state
        .db
        .executives()
        .find_one(doc! { "_id": &executive_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Executive not found")))?;

    let (entries, summary) = state.commissions.executive_ledger(&executive_id).await?;
    Ok(Json(ExecutiveCommissionLedgerResponse {
        executive_id,
        summary,
        entries: entries.into_iter().map(CommissionEntryResponse::from).collect(),
    }))
}

/// Pay out part (or all) of an executive's pending commission.
pub async fn pay_commission(
    State(state): State<AppState>,
    Path(executive_id): Path<String>,
    Json(payload): Json<PayCommissionRequest>,
) -> Result<(StatusCode, Json<PayCommissionResponse>), AppError> {
    payload.validate()?;

    let affected = state
        .commissions
        .pay(&executive_id, payload.amount, payload.remarks.as_deref())
        .await?;

    Ok((
        StatusCode::OK,
        Json(PayCommissionResponse {
            executive_id,
            amount: payload.amount,
            affected_entry_ids: affected,
        }),
    ))
}
