use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::keys;
use oftalmo_core::models::evaluation::{Evaluation, EvaluationInput};
use oftalmo_core::refraction::{self, BestRefractions};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::routes::session::cookie_collaborator;
use crate::state::AppState;

pub async fn list_patient_evaluations(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<Evaluation>>, ApiError> {
    repo::get_patient(&state, patient_id).await?;
    Ok(Json(repo::patient_evaluations(&state, patient_id).await?))
}

/// Open a new evaluation for a patient.
///
/// Without explicit collaborators the evaluation is attributed to the
/// collaborator selected in the session cookie.
pub async fn create_evaluation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
    headers: HeaderMap,
    Json(mut input): Json<EvaluationInput>,
) -> Result<(StatusCode, Json<Evaluation>), ApiError> {
    input.validate()?;
    repo::get_patient(&state, patient_id).await?;
    repo::get_clinic(&state, input.clinic_id)
        .await
        .map_err(|e| match e {
            ApiError::NotFound(msg) => ApiError::BadRequest(msg),
            other => other,
        })?;

    if input.collaborator_ids.is_empty() {
        input.collaborator_ids.extend(cookie_collaborator(&headers));
    }
    repo::require_collaborators(&state, &input.collaborator_ids).await?;

    let evaluation = Evaluation::from_input(patient_id, input, now());
    repo::save_new(&state, &keys::evaluation(evaluation.id), &evaluation).await?;

    AuditEvent::new(
        AuditAction::Create,
        ResourceType::Evaluation,
        evaluation.id,
        &user.sub,
    )
    .with_details(serde_json::json!({ "patient_id": patient_id }))
    .emit();
    Ok((StatusCode::CREATED, Json(evaluation)))
}

pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Evaluation>, ApiError> {
    Ok(Json(repo::get_evaluation(&state, id).await?))
}

pub async fn delete_evaluation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    repo::get_evaluation(&state, id).await?;
    let files = repo::delete_evaluation_cascade(&state, id).await?;

    AuditEvent::new(AuditAction::Delete, ResourceType::Evaluation, id, &user.sub)
        .with_details(serde_json::json!({ "attachments": files }))
        .emit();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn best_refraction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BestRefractions>, ApiError> {
    let evaluation = repo::get_evaluation(&state, id).await?;
    Ok(Json(refraction::best_refractions(&evaluation.refractions)))
}
