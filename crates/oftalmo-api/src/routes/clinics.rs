use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::keys;
use oftalmo_core::models::clinic::{Clinic, ClinicInput};
use oftalmo_core::models::collaborator::Collaborator;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::state::AppState;

pub async fn list_clinics(State(state): State<AppState>) -> Result<Json<Vec<Clinic>>, ApiError> {
    let mut clinics = repo::list_clinics(&state).await?;
    clinics.sort_by_cached_key(|c| c.name.to_lowercase());
    Ok(Json(clinics))
}

pub async fn get_clinic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Clinic>, ApiError> {
    Ok(Json(repo::get_clinic(&state, id).await?))
}

pub async fn list_clinic_collaborators(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Collaborator>>, ApiError> {
    let clinic = repo::get_clinic(&state, id).await?;
    let members = repo::existing_collaborators(&state, &clinic.collaborator_ids).await?;
    Ok(Json(members))
}

pub async fn create_clinic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ClinicInput>,
) -> Result<(StatusCode, Json<Clinic>), ApiError> {
    input.validate()?;
    repo::require_collaborators(&state, &input.collaborator_ids).await?;

    let clinic = Clinic::from_input(input, now());
    repo::save_new(&state, &keys::clinic(clinic.id), &clinic).await?;

    AuditEvent::new(AuditAction::Create, ResourceType::Clinic, clinic.id, &user.sub).emit();
    Ok((StatusCode::CREATED, Json(clinic)))
}

pub async fn update_clinic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ClinicInput>,
) -> Result<Json<Clinic>, ApiError> {
    input.validate()?;
    repo::require_collaborators(&state, &input.collaborator_ids).await?;

    let (clinic, ()) = repo::modify_clinic(&state, id, |clinic| {
        clinic.replace(input, now());
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Clinic, id, &user.sub).emit();
    Ok(Json(clinic))
}

pub async fn delete_clinic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    repo::get_clinic(&state, id).await?;

    let in_use = repo::list_evaluations(&state)
        .await?
        .iter()
        .filter(|e| e.clinic_id == id)
        .count();
    if in_use > 0 {
        return Err(ApiError::Conflict(format!(
            "clinic is referenced by {in_use} evaluation(s)"
        )));
    }
    state.store().delete(&keys::clinic(id)).await?;

    AuditEvent::new(AuditAction::Delete, ResourceType::Clinic, id, &user.sub).emit();
    Ok(StatusCode::NO_CONTENT)
}
