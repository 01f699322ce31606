use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use backoffice_core::error::AppError;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use validator::Validate;

use crate::dtos::{CreatePlotRequest, PlotListParams, PlotResponse, UpdatePlotRequest};
use crate::models::{Plot, PlotStatus};
use crate::services::database::is_duplicate_key_error;
use crate::startup::AppState;

pub async fn create_plot(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlotRequest>,
) -> Result<(StatusCode, Json<PlotResponse>), AppError> {
    payload.validate()?;

    state
        .db
        .projects()
        .find_one(doc! { "_id": &payload.project_id, "active": true }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

    let plot = Plot::new(
        payload.project_id,
        payload.plot_number,
        payload.size_sqft,
        payload.rate_per_sqft,
    );

    state.db.plots().insert_one(&plot, None).await.map_err(|e| {
        if is_duplicate_key_error(&e) {
            AppError::Conflict(anyhow::anyhow!(
                "Plot '{}' already exists in this project",
                plot.plot_number
            ))
        } else {
            AppError::from(e)
        }
    })?;

    tracing::info!(plot_id = %plot.id, plot_number = %plot.plot_number, "Plot created");
    Ok((StatusCode::CREATED, Json(PlotResponse::from(plot))))
}

pub async fn list_plots(
    State(state): State<AppState>,
    Query(params): Query<PlotListParams>,
) -> Result<Json<Vec<PlotResponse>>, AppError> {
    let mut filter = doc! { "active": true };
    if let Some(project_id) = params.project_id {
        filter.insert("project_id", project_id);
    }
    if let Some(status) = params.status {
        filter.insert("status", status.as_str());
    }

    let cursor = state.db.plots().find(filter, None).await?;
    let plots: Vec<Plot> = cursor.try_collect().await?;
    Ok(Json(plots.into_iter().map(PlotResponse::from).collect()))
}

pub async fn get_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<String>,
) -> Result<Json<PlotResponse>, AppError> {
    let plot = state
        .db
        .plots()
        .find_one(doc! { "_id": &plot_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plot not found")))?;
    Ok(Json(PlotResponse::from(plot)))
}

/// Size/rate edits recompute the derived total; a sold plot is frozen, and
/// `sold` itself can only be reached through a customer booking.
pub async fn update_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<String>,
    Json(payload): Json<UpdatePlotRequest>,
) -> Result<Json<PlotResponse>, AppError> {
    let plot = state
        .db
        .plots()
        .find_one(doc! { "_id": &plot_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plot not found")))?;

    if plot.status == PlotStatus::Sold {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Plot {} is sold and can no longer be modified",
            plot.plot_number
        )));
    }
    if payload.status == Some(PlotStatus::Sold) {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Plots are sold through customer booking, not directly"
        )));
    }

    let size_sqft = payload.size_sqft.unwrap_or(plot.size_sqft);
    let rate_per_sqft = payload.rate_per_sqft.unwrap_or(plot.rate_per_sqft);
    if size_sqft <= 0.0 || rate_per_sqft <= 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Plot size and rate must be positive"
        )));
    }

    let mut update = doc! {
        "size_sqft": size_sqft,
        "rate_per_sqft": rate_per_sqft,
        "total_value": Plot::compute_total(size_sqft, rate_per_sqft),
        "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()),
    };
    if let Some(status) = payload.status {
        update.insert("status", status.as_str());
    }

    state
        .db
        .plots()
        .update_one(doc! { "_id": &plot_id }, doc! { "$set": update }, None)
        .await?;

    let plot = state
        .db
        .plots()
        .find_one(doc! { "_id": &plot_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Plot not found")))?;
    Ok(Json(PlotResponse::from(plot)))
}
