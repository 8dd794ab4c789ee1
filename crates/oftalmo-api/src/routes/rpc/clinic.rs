use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::models::clinic::Clinic;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub clinic_id: Uuid,
    pub collaborator_id: Uuid,
}

pub async fn add_collaborator(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MembershipRequest>,
) -> Result<Json<Clinic>, ApiError> {
    repo::require_collaborators(&state, &[req.collaborator_id]).await?;

    let (clinic, added) = repo::modify_clinic(&state, req.clinic_id, |clinic| {
        let added = clinic.add_collaborator(req.collaborator_id);
        if added {
            clinic.updated_at = now();
        }
        Ok(added)
    })
    .await?;

    if added {
        AuditEvent::new(AuditAction::Update, ResourceType::Clinic, req.clinic_id, &user.sub)
            .with_details(serde_json::json!({ "added_collaborator": req.collaborator_id }))
            .emit();
    }
    Ok(Json(clinic))
}

pub async fn remove_collaborator(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MembershipRequest>,
) -> Result<Json<Clinic>, ApiError> {
    let (clinic, removed) = repo::modify_clinic(&state, req.clinic_id, |clinic| {
        let removed = clinic.remove_collaborator(req.collaborator_id);
        if removed {
            clinic.updated_at = now();
        }
        Ok(removed)
    })
    .await?;

    if removed {
        AuditEvent::new(AuditAction::Update, ResourceType::Clinic, req.clinic_id, &user.sub)
            .with_details(serde_json::json!({ "removed_collaborator": req.collaborator_id }))
            .emit();
    }
    Ok(Json(clinic))
}
