use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::keys;
use oftalmo_core::models::patient::{Patient, PatientInput};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::{now, today};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PatientQuery {
    q: Option<String>,
}

pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let mut patients = repo::list_patients(&state).await?;
    if let Some(q) = query.q.as_deref() {
        patients.retain(|p| p.matches(q));
    }
    patients.sort_by_cached_key(|p| p.name.to_lowercase());
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(repo::get_patient(&state, id).await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<PatientInput>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    input.validate(today())?;
    ensure_unique_record(&state, &input.medical_record, None).await?;

    let patient = Patient::from_input(input, now());
    repo::save_new(&state, &keys::patient(patient.id), &patient).await?;

    AuditEvent::new(AuditAction::Create, ResourceType::Patient, patient.id, &user.sub).emit();
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, ApiError> {
    input.validate(today())?;
    ensure_unique_record(&state, &input.medical_record, Some(id)).await?;

    let (patient, ()) = repo::modify_patient(&state, id, |patient| {
        patient.replace(input, now());
        Ok(())
    })
    .await?;

    AuditEvent::new(AuditAction::Update, ResourceType::Patient, id, &user.sub).emit();
    Ok(Json(patient))
}

/// Delete a patient with all of their evaluations and uploaded files.
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    repo::get_patient(&state, id).await?;

    let evaluations = repo::patient_evaluations(&state, id).await?;
    let mut files = 0;
    for evaluation in &evaluations {
        files += repo::delete_evaluation_cascade(&state, evaluation.id).await?;
    }
    state.store().delete(&keys::patient(id)).await?;

    AuditEvent::new(AuditAction::Delete, ResourceType::Patient, id, &user.sub)
        .with_details(serde_json::json!({
            "evaluations": evaluations.len(),
            "attachments": files,
        }))
        .emit();
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_unique_record(
    state: &AppState,
    medical_record: &str,
    except: Option<Uuid>,
) -> Result<(), ApiError> {
    let wanted = medical_record.trim();
    let taken = repo::list_patients(state)
        .await?
        .into_iter()
        .any(|p| Some(p.id) != except && p.medical_record.eq_ignore_ascii_case(wanted));
    if taken {
        return Err(ApiError::Conflict(format!(
            "medical record {wanted} already belongs to another patient"
        )));
    }
    Ok(())
}
