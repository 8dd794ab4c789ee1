use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::models::evaluation::{Evaluation, EvaluationUpdate};
use oftalmo_core::models::refraction::{Refraction, RefractionInput};
use oftalmo_core::models::surgery::{Surgery, SurgeryInput};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Uuid,
    #[serde(default)]
    pub update: EvaluationUpdate,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationRef {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddRefractionRequest {
    pub id: Uuid,
    pub refraction: RefractionInput,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRefractionRequest {
    pub id: Uuid,
    pub refraction_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddSurgeryRequest {
    pub id: Uuid,
    pub surgery: SurgeryInput,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSurgeryRequest {
    pub id: Uuid,
    pub surgery_id: Uuid,
}

/// Save the evaluation form.
///
/// Scalar fields and eye logs are applied together and written back under
/// the ETag read at the start, so either the whole update lands or none of
/// it does.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    if let Some(ids) = &req.update.collaborator_ids {
        repo::require_collaborators(&state, ids).await?;
    }

    let eye_log_fields = req
        .update
        .eye_logs
        .as_ref()
        .map_or(0, |patch| patch.right.len() + patch.left.len());
    let update = req.update;
    let (evaluation, ()) = repo::modify_evaluation(&state, req.id, |evaluation| {
        evaluation.apply_update(update, now())?;
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Evaluation, req.id, &user.sub)
        .with_details(serde_json::json!({ "eye_log_fields": eye_log_fields }))
        .emit();
    Ok(Json(evaluation))
}

/// Lock the evaluation against further edits. Finalizing twice is a no-op.
pub async fn finalize(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EvaluationRef>,
) -> Result<Json<Evaluation>, ApiError> {
    let (evaluation, changed) = repo::modify_evaluation(&state, req.id, |evaluation| {
        if evaluation.is_finalized() {
            return Ok(false);
        }
        evaluation.finalize(now());
        Ok(true)
    })
    .await?;

    if changed {
        AuditEvent::new(AuditAction::Finalize, ResourceType::Evaluation, req.id, &user.sub).emit();
    }
    Ok(Json(evaluation))
}

pub async fn reopen(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EvaluationRef>,
) -> Result<Json<Evaluation>, ApiError> {
    let (evaluation, changed) = repo::modify_evaluation(&state, req.id, |evaluation| {
        if !evaluation.is_finalized() {
            return Ok(false);
        }
        evaluation.reopen(now());
        Ok(true)
    })
    .await?;

    if changed {
        AuditEvent::new(AuditAction::Reopen, ResourceType::Evaluation, req.id, &user.sub).emit();
    }
    Ok(Json(evaluation))
}

pub async fn add_refraction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddRefractionRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    req.refraction.validate()?;

    let refraction = Refraction::from_input(req.refraction, now());
    let refraction_id = refraction.id;
    let (evaluation, ()) = repo::modify_evaluation(&state, req.id, |evaluation| {
        evaluation.add_refraction(refraction, now())?;
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Evaluation, req.id, &user.sub)
        .with_details(serde_json::json!({ "added_refraction": refraction_id }))
        .emit();
    Ok(Json(evaluation))
}

pub async fn remove_refraction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RemoveRefractionRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    let (evaluation, _) = repo::modify_evaluation(&state, req.id, |evaluation| {
        Ok(evaluation.remove_refraction(req.refraction_id, now())?)
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Evaluation, req.id, &user.sub)
        .with_details(serde_json::json!({ "removed_refraction": req.refraction_id }))
        .emit();
    Ok(Json(evaluation))
}

pub async fn add_surgery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddSurgeryRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    req.surgery.validate()?;

    let surgery = Surgery::from_input(req.surgery);
    let surgery_id = surgery.id;
    let (evaluation, ()) = repo::modify_evaluation(&state, req.id, |evaluation| {
        evaluation.add_surgery(surgery, now())?;
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Evaluation, req.id, &user.sub)
        .with_details(serde_json::json!({ "added_surgery": surgery_id }))
        .emit();
    Ok(Json(evaluation))
}

pub async fn remove_surgery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RemoveSurgeryRequest>,
) -> Result<Json<Evaluation>, ApiError> {
    let (evaluation, _) = repo::modify_evaluation(&state, req.id, |evaluation| {
        Ok(evaluation.remove_surgery(req.surgery_id, now())?)
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Evaluation, req.id, &user.sub)
        .with_details(serde_json::json!({ "removed_surgery": req.surgery_id }))
        .emit();
    Ok(Json(evaluation))
}
