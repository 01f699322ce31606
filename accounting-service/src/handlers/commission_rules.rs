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

use crate::dtos::{
    CommissionRuleResponse, CreateCommissionRuleRequest, UpdateCommissionRuleRequest,
};
use crate::models::{CommissionRule, RuleScope};
use crate::services::database::is_duplicate_key_error;
use crate::startup::AppState;

pub async fn create_commission_rule(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommissionRuleRequest>,
) -> Result<(StatusCode, Json<CommissionRuleResponse>), AppError> {
    payload.validate()?;

    let scope = match payload.project_id {
        Some(project_id) => {
            state
                .db
                .projects()
                .find_one(doc! { "_id": &project_id, "active": true }, None)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;
            RuleScope::Project(project_id)
        }
        None => RuleScope::Global,
    };

    let rule = CommissionRule::new(
        payload.name,
        payload.applies_to_role,
        payload.kind,
        payload.value,
        payload.trigger_event,
        payload.basis,
        scope,
    );

    state
        .db
        .commission_rules()
        .insert_one(&rule, None)
        .await
        .map_err(|e| {
            if is_duplicate_key_error(&e) {
                AppError::Conflict(anyhow::anyhow!(
                    "Commission rule '{}' already exists",
                    rule.name
                ))
            } else {
                AppError::from(e)
            }
        })?;

    tracing::info!(rule_id = %rule.id, name = %rule.name, "Commission rule created");
    Ok((StatusCode::CREATED, Json(CommissionRuleResponse::from(rule))))
}

pub async fn list_commission_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommissionRuleResponse>>, AppError> {
    let cursor = state.db.commission_rules().find(doc! {}, None).await?;
    let rules: Vec<CommissionRule> = cursor.try_collect().await?;
    Ok(Json(
        rules.into_iter().map(CommissionRuleResponse::from).collect(),
    ))
}

pub async fn get_commission_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
) -> Result<Json<CommissionRuleResponse>, AppError> {
    let rule = state
        .db
        .commission_rules()
        .find_one(doc! { "_id": &rule_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Commission rule not found")))?;
    Ok(Json(CommissionRuleResponse::from(rule)))
}

/// Rule edits only shape future accruals; entries already on the
/// commission ledger keep the amounts they were computed with.
pub async fn update_commission_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
    Json(payload): Json<UpdateCommissionRuleRequest>,
) -> Result<Json<CommissionRuleResponse>, AppError> {
    let mut update = doc! { "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now()) };
    if let Some(value) = payload.value {
        if value <= 0.0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Rule value must be positive"
            )));
        }
        update.insert("value", value);
    }
    if let Some(active) = payload.active {
        update.insert("active", active);
    }

    let result = state
        .db
        .commission_rules()
        .update_one(doc! { "_id": &rule_id }, doc! { "$set": update }, None)
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Commission rule not found"
        )));
    }

    let rule = state
        .db
        .commission_rules()
        .find_one(doc! { "_id": &rule_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Commission rule not found")))?;
    Ok(Json(CommissionRuleResponse::from(rule)))
}
