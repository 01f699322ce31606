//! Customer booking flow.
//!
//! Creating a customer books the plot (irreversibly marks it sold), opens
//! the customer's ledger with a debit for the full deal value, and hands
//! the deal-closed trigger to the commission engine.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use validator::Validate;

use crate::dtos::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
use crate::middleware::ActorContext;
use crate::models::money::round2;
use crate::models::{Customer, PartyType, PlotStatus, ReferenceType, TriggerEvent};
use crate::services::{CommissionTrigger, PostLedgerEntry};
use crate::startup::AppState;

pub async fn create_customer(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    payload.validate()?;

    state
        .db
        .projects()
        .find_one(doc! { "_id": &payload.project_id, "active": true }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

    let plot = state
        .db
        .plots()
        .find_one(doc! { "_id": &payload.plot_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plot not found")))?;
    if plot.project_id != payload.project_id {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Plot {} does not belong to the given project",
            plot.plot_number
        )));
    }
    if !plot.is_bookable() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Plot {} is not available for booking",
            plot.plot_number
        )));
    }

    if let Some(executive_id) = payload.executive_id.as_deref() {
        state
            .db
            .executives()
            .find_one(doc! { "_id": executive_id, "active": true }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Executive not found")))?;
    }

    let customer = Customer::new(
        payload.name,
        payload.phone,
        payload.email,
        payload.address,
        payload.project_id,
        payload.plot_id,
        payload.executive_id,
        payload.deal_value,
    );
    state.db.customers().insert_one(&customer, None).await?;

    // The plot leaves circulation the moment the booking lands.
    state
        .db
        .plots()
        .update_one(
            doc! { "_id": &customer.plot_id },
            doc! { "$set": {
                "status": PlotStatus::Sold.as_str(),
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
                debit: customer.deal_value,
                credit: 0.0,
                description: format!("Plot {} booked", plot.plot_number),
                reference_type: ReferenceType::Booking,
                reference_id: Some(customer.id.clone()),
                transaction_date: None,
            },
            &actor.user_id,
        )
        .await?;

    state
        .commissions
        .process(
            TriggerEvent::DealClosed,
            CommissionTrigger {
                executive_id: customer.executive_id.clone(),
                project_id: customer.project_id.clone(),
                customer_id: Some(customer.id.clone()),
                deal_value: customer.deal_value,
                received_amount: 0.0,
                transaction_id: None,
            },
        )
        .await?;

    tracing::info!(
        customer_id = %customer.id,
        plot_id = %customer.plot_id,
        deal_value = customer.deal_value,
        "Customer booked"
    );
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let cursor = state
        .db
        .customers()
        .find(doc! { "active": true }, None)
        .await?;
    let customers: Vec<Customer> = cursor.try_collect().await?;
    Ok(Json(
        customers.into_iter().map(CustomerResponse::from).collect(),
    ))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state
        .db
        .customers()
        .find_one(doc! { "_id": &customer_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;
    Ok(Json(CustomerResponse::from(customer)))
}

/// Contact and deal edits. `project_id`/`plot_id` are immutable; a deal
/// value change re-derives the outstanding balance.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state
        .db
        .customers()
        .find_one(doc! { "_id": &customer_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

    if let Some(executive_id) = payload.executive_id.as_deref() {
        state
            .db
            .executives()
            .find_one(doc! { "_id": executive_id, "active": true }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Executive not found")))?;
    }

    let mut update = doc! { "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()) };
    if let Some(name) = payload.name {
        update.insert("name", name);
    }
    if let Some(phone) = payload.phone {
        update.insert("phone", phone);
    }
    if let Some(email) = payload.email {
        update.insert("email", email);
    }
    if let Some(address) = payload.address {
        update.insert("address", address);
    }
    if let Some(executive_id) = payload.executive_id {
        update.insert("executive_id", executive_id);
    }
    if let Some(active) = payload.active {
        update.insert("active", active);
    }
    if let Some(deal_value) = payload.deal_value {
        if deal_value <= 0.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Deal value must be positive"
            )));
        }
        update.insert("deal_value", deal_value);
        update.insert("balance_amount", round2(deal_value - customer.paid_amount));
    }

    state
        .db
        .customers()
        .update_one(doc! { "_id": &customer_id }, doc! { "$set": update }, None)
        .await?;

    let customer = state
        .db
        .customers()
        .find_one(doc! { "_id": &customer_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;
    Ok(Json(CustomerResponse::from(customer)))
}
