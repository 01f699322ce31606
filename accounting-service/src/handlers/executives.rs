use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use futures::TryStreamExt;
use mongodb::bson::doc;
use validator::Validate;

use crate::dtos::{CreateExecutiveRequest, ExecutiveResponse};
use crate::models::Executive;
use crate::startup::AppState;

pub async fn create_executive(
    State(state): State<AppState>,
    Json(payload): Json<CreateExecutiveRequest>,
) -> Result<(StatusCode, Json<ExecutiveResponse>), AppError> {
    payload.validate()?;

    let executive = Executive::new(payload.name, payload.phone, payload.role);
    state.db.executives().insert_one(&executive, None).await?;

    tracing::info!(executive_id = %executive.id, role = %executive.role, "Executive created");
    Ok((StatusCode::CREATED, Json(ExecutiveResponse::from(executive))))
}

pub async fn list_executives(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExecutiveResponse>>, AppError> {
    let cursor = state
        .db
        .executives()
        .find(doc! { "active": true }, None)
        .await?;
    let executives: Vec<Executive> = cursor.try_collect().await?;
    Ok(Json(
        executives.into_iter().map(ExecutiveResponse::from).collect(),
    ))
}

pub async fn get_executive(
    State(state): State<AppState>,
    Path(executive_id): Path<String>,
) -> Result<Json<ExecutiveResponse>, AppError> {
    let executive = state
        .db
        .executives()
        .find_one(doc! { "_id": &executive_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Executive not found")))?;
    Ok(Json(ExecutiveResponse::from(executive)))
}
