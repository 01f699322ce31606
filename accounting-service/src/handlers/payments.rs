//! Payment recording and reversal.
//!
//! A payment touches four places in one logical operation: the immutable
//! transaction record, the customer's denormalized paid/balance fields, the
//! customer's ledger (credit row), and the commission engine. A reversal
//! appends a compensating debit row and restores the customer fields; the
//! original transaction is only flagged, never rewritten.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions};
use validator::Validate;

use crate::dtos::{PaymentListParams, RecordPaymentRequest, TransactionResponse};
use crate::middleware::ActorContext;
use crate::models::money::round2;
use crate::models::{PartyType, PaymentTransaction, ReferenceType, TriggerEvent};
use crate::services::{CommissionTrigger, PostLedgerEntry};
use crate::startup::AppState;

pub async fn record_payment(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    payload.validate()?;

    let customer = state
        .db
        .customers()
        .find_one(doc! { "_id": &payload.customer_id, "active": true }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

    let new_paid = round2(customer.paid_amount + payload.amount);
    let new_balance = round2(customer.deal_value - new_paid);

    let transaction = PaymentTransaction::new(
        customer.id.clone(),
        payload.amount,
        payload.method,
        payload.reference_no,
        payload.transaction_date.unwrap_or_else(Utc::now),
        new_balance,
        payload.remarks,
        actor.user_id.clone(),
    );
    state
        .db
        .transactions()
        .insert_one(&transaction, None)
        .await?;

    state
        .db
        .customers()
        .update_one(
            doc! { "_id": &customer.id },
            doc! { "$set": {
                "paid_amount": new_paid,
                "balance_amount": new_balance,
                "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()),
            }},
            None,
        )
        .await?;

    state
        .ledger
        .post(
            PostLedgerEntry {
                party_type: PartyType::Customer,
                party_id: customer.id.clone(),
                debit: 0.0,
                credit: transaction.amount,
                description: format!("Payment received ({})", transaction.id),
                reference_type: ReferenceType::Payment,
                reference_id: Some(transaction.id.clone()),
                transaction_date: Some(transaction.transaction_date),
            },
            &actor.user_id,
        )
        .await?;

    state
        .commissions
        .process(
            TriggerEvent::PaymentReceived,
            CommissionTrigger {
                executive_id: customer.executive_id.clone(),
                project_id: customer.project_id.clone(),
                customer_id: Some(customer.id.clone()),
                deal_value: customer.deal_value,
                received_amount: transaction.amount,
                transaction_id: Some(transaction.id.clone()),
            },
        )
        .await?;

    metrics::counter!("payments_recorded_total").increment(1);
    tracing::info!(
        transaction_id = %transaction.id,
        customer_id = %customer.id,
        amount = transaction.amount,
        balance = new_balance,
        "Payment recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from(transaction)),
    ))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let mut filter = doc! {};
    if let Some(customer_id) = params.customer_id {
        filter.insert("customer_id", customer_id);
    }
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();
    let cursor = state.db.transactions().find(filter, options).await?;
    let transactions: Vec<PaymentTransaction> = cursor.try_collect().await?;
    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .db
        .transactions()
        .find_one(doc! { "_id": &transaction_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Transaction not found")))?;
    Ok(Json(TransactionResponse::from(transaction)))
}

pub async fn reverse_payment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .db
        .transactions()
        .find_one(doc! { "_id": &transaction_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Transaction not found")))?;
    if transaction.reversed {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Transaction {} is already reversed",
            transaction.id
        )));
    }

    let customer = state
        .db
        .customers()
        .find_one(doc! { "_id": &transaction.customer_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

    state
        .db
        .transactions()
        .update_one(
            doc! { "_id": &transaction.id },
            doc! { "$set": { "reversed": true } },
            None,
        )
        .await?;

    let new_paid = round2(customer.paid_amount - transaction.amount);
    let new_balance = round2(customer.deal_value - new_paid);
    state
        .db
        .customers()
        .update_one(
            doc! { "_id": &customer.id },
            doc! { "$set": {
                "paid_amount": new_paid,
                "balance_amount": new_balance,
                "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()),
            }},
            None,
        )
        .await?;

    state
        .ledger
        .post(
            PostLedgerEntry {
                party_type: PartyType::Customer,
                party_id: customer.id.clone(),
                debit: transaction.amount,
                credit: 0.0,
                description: format!("Reversal of payment ({})", transaction.id),
                reference_type: ReferenceType::PaymentReversal,
                reference_id: Some(transaction.id.clone()),
                transaction_date: None,
            },
            &actor.user_id,
        )
        .await?;

    tracing::info!(
        transaction_id = %transaction.id,
        customer_id = %customer.id,
        amount = transaction.amount,
        "Payment reversed"
    );

    let transaction = state
        .db
        .transactions()
        .find_one(doc! { "_id": &transaction_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Transaction not found")))?;
    Ok(Json(TransactionResponse::from(transaction)))
}
