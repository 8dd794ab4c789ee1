use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::keys;
use oftalmo_core::models::clinic::Clinic;
use oftalmo_export::render::render_summary;
use oftalmo_export::styles::DocumentStyles;
use oftalmo_export::summary::SummaryContext;
use oftalmo_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::state::AppState;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Render the evaluation summary as plain text.
///
/// A deleted clinic or collaborator leaves a gap in the summary rather than
/// failing the export.
async fn rendered_summary(state: &AppState, id: Uuid) -> Result<String, ApiError> {
    let evaluation = repo::get_evaluation(state, id).await?;
    let patient = repo::get_patient(state, evaluation.patient_id).await?;
    let clinic = records::load_optional::<Clinic>(state.store(), &keys::clinic(evaluation.clinic_id))
        .await?
        .map(|(clinic, _)| clinic);
    let collaborators = repo::existing_collaborators(state, &evaluation.collaborator_ids).await?;

    let context = SummaryContext::new(&evaluation, &patient, clinic.as_ref(), &collaborators);
    Ok(render_summary(&context)?)
}

pub async fn summary_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let text = rendered_summary(&state, id).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

pub async fn summary_docx(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let text = rendered_summary(&state, id).await?;
    let bytes = oftalmo_export::docx::generate_docx(&text, &DocumentStyles::default())?;

    AuditEvent::new(AuditAction::Export, ResourceType::Evaluation, id, &user.sub)
        .with_details(serde_json::json!({ "format": "docx", "bytes": bytes.len() }))
        .emit();

    let disposition = format!("attachment; filename=\"evaluation-{id}.docx\"");
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
