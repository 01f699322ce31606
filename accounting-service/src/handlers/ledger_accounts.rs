use axum::{extract::State, http::StatusCode, Json};
use backoffice_core::error::AppError;
use futures::TryStreamExt;
use mongodb::bson::doc;
use validator::Validate;

use crate::dtos::{CreateLedgerAccountRequest, LedgerAccountResponse};
use crate::middleware::ActorContext;
use crate::models::{LedgerAccount, PartyType, ReferenceType};
use crate::services::database::is_duplicate_key_error;
use crate::services::PostLedgerEntry;
use crate::startup::AppState;

/// Create a book account. A nonzero opening balance is posted as the
/// account's first ledger row (debit when positive, credit when negative).
pub async fn create_ledger_account(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(payload): Json<CreateLedgerAccountRequest>,
) -> Result<(StatusCode, Json<LedgerAccountResponse>), AppError> {
    payload.validate()?;

    let account = LedgerAccount::new(payload.name, payload.account_type, payload.opening_balance);
    state
        .db
        .ledger_accounts()
        .insert_one(&account, None)
        .await
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::Conflict(anyhow::anyhow!(
                    "Ledger account '{}' already exists",
                    account.name
                ))
            } else {
                AppError::from(e)
            }
        })?;

    if account.opening_balance != 0.0 {
        let (debit, credit) = if account.opening_balance > 0.0 {
            (account.opening_balance, 0.0)
        } else {
            (0.0, -account.opening_balance)
        };
        state
            .ledger
            .post(
                PostLedgerEntry {
                    party_type: PartyType::LedgerAccount,
                    party_id: account.id.clone(),
                    debit,
                    credit,
                    description: format!("Opening balance for {}", account.name),
                    reference_type: ReferenceType::OpeningBalance,
                    reference_id: Some(account.id.clone()),
                    transaction_date: None,
                },
                &actor.user_id,
            )
            .await?;
    }

    tracing::info!(account_id = %account.id, name = %account.name, "Ledger account created");
    Ok((StatusCode::CREATED, Json(LedgerAccountResponse::from(account))))
}

pub async fn list_ledger_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<LedgerAccountResponse>>, AppError> {
    let cursor = state
        .db
        .ledger_accounts()
        .find(doc! { "active": true }, None)
        .await?;
    let accounts: Vec<LedgerAccount> = cursor.try_collect().await?;
    Ok(Json(
        accounts.into_iter().map(LedgerAccountResponse::from).collect(),
    ))
}
