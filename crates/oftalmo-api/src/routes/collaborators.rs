use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::keys;
use oftalmo_core::models::collaborator::{Collaborator, CollaboratorInput, CollaboratorRole};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CollaboratorQuery {
    role: Option<CollaboratorRole>,
}

pub async fn list_collaborators(
    State(state): State<AppState>,
    Query(query): Query<CollaboratorQuery>,
) -> Result<Json<Vec<Collaborator>>, ApiError> {
    let mut collaborators = repo::list_collaborators(&state).await?;
    if let Some(role) = query.role {
        collaborators.retain(|c| c.role == role);
    }
    collaborators.sort_by_cached_key(|c| c.name.to_lowercase());
    Ok(Json(collaborators))
}

pub async fn get_collaborator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Collaborator>, ApiError> {
    Ok(Json(repo::get_collaborator(&state, id).await?))
}

pub async fn create_collaborator(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CollaboratorInput>,
) -> Result<(StatusCode, Json<Collaborator>), ApiError> {
    input.validate()?;

    let collaborator = Collaborator::from_input(input, now());
    repo::save_new(&state, &keys::collaborator(collaborator.id), &collaborator).await?;

    AuditEvent::new(
        AuditAction::Create,
        ResourceType::Collaborator,
        collaborator.id,
        &user.sub,
    )
    .emit();
    Ok((StatusCode::CREATED, Json(collaborator)))
}

pub async fn update_collaborator(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<CollaboratorInput>,
) -> Result<Json<Collaborator>, ApiError> {
    input.validate()?;

    let (collaborator, ()) = repo::modify_collaborator(&state, id, |c| {
        c.replace(input, now());
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Collaborator, id, &user.sub).emit();
    Ok(Json(collaborator))
}

/// Delete a collaborator and drop them from every clinic.
///
/// Evaluations keep the id so past records still show who attended.
pub async fn delete_collaborator(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    repo::get_collaborator(&state, id).await?;

    let mut clinics = 0;
    for clinic in repo::list_clinics(&state).await? {
        if !clinic.collaborator_ids.contains(&id) {
            continue;
        }
        repo::modify_clinic(&state, clinic.id, |c| {
            if c.remove_collaborator(id) {
                c.updated_at = now();
            }
            Ok(())
        })
        .await?;
        clinics += 1;
    }
    state.store().delete(&keys::collaborator(id)).await?;

    AuditEvent::new(AuditAction::Delete, ResourceType::Collaborator, id, &user.sub)
        .with_details(serde_json::json!({ "clinics": clinics }))
        .emit();
    Ok(StatusCode::NO_CONTENT)
}
