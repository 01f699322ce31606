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

use crate::dtos::{CreateProjectRequest, ProjectResponse, UpdateProjectRequest};
use crate::models::Project;
use crate::services::database::is_duplicate_key_error;
use crate::startup::AppState;

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    payload.validate()?;

    let project = Project::new(
        payload.name,
        payload.code,
        payload.location,
        payload.description,
    );

    state
        .db
        .projects()
        .insert_one(&project, None)
        .await
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::Conflict(anyhow::anyhow!(
                    "Project with code '{}' already exists",
                    project.code
                ))
            } else {
                AppError::from(e)
            }
        })?;

    tracing::info!(project_id = %project.id, code = %project.code, "Project created");
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let cursor = state.db.projects().find(doc! { "active": true }, None).await?;
    let projects: Vec<Project> = cursor.try_collect().await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = state
        .db
        .projects()
        .find_one(doc! { "_id": &project_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;
    Ok(Json(ProjectResponse::from(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let mut update = doc! { "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()) };
    if let Some(name) = payload.name {
        update.insert("name", name);
    }
    if let Some(location) = payload.location {
        update.insert("location", location);
    }
    if let Some(description) = payload.description {
        update.insert("description", description);
    }
    if let Some(active) = payload.active {
        update.insert("active", active);
    }

    let result = state
        .db
        .projects()
        .update_one(doc! { "_id": &project_id }, doc! { "$set": update }, None)
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Project not found")));
    }

    let project = state
        .db
        .projects()
        .find_one(doc! { "_id": &project_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;
    Ok(Json(ProjectResponse::from(project)))
}
