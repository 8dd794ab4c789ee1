use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oftalmo_audit::{AuditAction, AuditEvent, ResourceType};
use oftalmo_core::models::attachment::{Attachment, AttachmentInput};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::repo;
use crate::routes::now;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub evaluation_id: Uuid,
    #[serde(flatten)]
    pub attachment: AttachmentInput,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRef {
    pub evaluation_id: Uuid,
    pub attachment_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UploadTicket {
    pub attachment: Attachment,
    pub upload_url: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct DownloadTicket {
    pub attachment: Attachment,
    pub download_url: String,
    pub expires_in_secs: u64,
}

/// Register an attachment and hand back a presigned PUT for its bytes.
///
/// The URL is signed before the record is saved, so a signing failure
/// leaves no attachment behind. The attachment stays `uploaded = false`
/// until `confirm_upload`.
pub async fn request_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadTicket>, ApiError> {
    req.attachment.validate()?;

    let attachment = Attachment::from_input(req.evaluation_id, req.attachment, now());
    let upload_url = state
        .store()
        .presign_put(
            &attachment.key,
            Some(attachment.content_type.as_str()),
            state.presign_ttl,
        )
        .await?;

    let (_, ()) = repo::modify_evaluation(&state, req.evaluation_id, |evaluation| {
        evaluation.add_attachment(attachment.clone(), now())?;
        Ok(())
    })
    .await?;

    AuditEvent::new(
        AuditAction::RequestUpload,
        ResourceType::Attachment,
        attachment.id,
        &user.sub,
    )
    .with_details(serde_json::json!({
        "evaluation_id": req.evaluation_id,
        "kind": attachment.kind,
    }))
    .emit();

    Ok(Json(UploadTicket {
        attachment,
        upload_url,
        expires_in_secs: state.presign_ttl.as_secs(),
    }))
}

pub async fn confirm_upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AttachmentRef>,
) -> Result<Json<Attachment>, ApiError> {
    let (_, attachment) = repo::modify_evaluation(&state, req.evaluation_id, |evaluation| {
        Ok(evaluation
            .confirm_attachment(req.attachment_id, now())?
            .clone())
    })
    .await?;

    AuditEvent::new(
        AuditAction::Update,
        ResourceType::Attachment,
        req.attachment_id,
        &user.sub,
    )
    .with_details(serde_json::json!({ "uploaded": true }))
    .emit();
    Ok(Json(attachment))
}

pub async fn request_download(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AttachmentRef>,
) -> Result<Json<DownloadTicket>, ApiError> {
    let evaluation = repo::get_evaluation(&state, req.evaluation_id).await?;
    let attachment = evaluation.attachment(req.attachment_id)?.clone();
    if !attachment.uploaded {
        return Err(ApiError::Conflict(format!(
            "attachment {} has not finished uploading",
            attachment.id
        )));
    }

    let download_url = state
        .store()
        .presign_get(&attachment.key, state.presign_ttl)
        .await?;

    AuditEvent::new(
        AuditAction::RequestDownload,
        ResourceType::Attachment,
        attachment.id,
        &user.sub,
    )
    .emit();

    Ok(Json(DownloadTicket {
        attachment,
        download_url,
        expires_in_secs: state.presign_ttl.as_secs(),
    }))
}

/// Delete the attachment's object, then drop its record.
///
/// If the object delete fails the record stays and the call can be retried.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AttachmentRef>,
) -> Result<StatusCode, ApiError> {
    let evaluation = repo::get_evaluation(&state, req.evaluation_id).await?;
    evaluation.ensure_open()?;
    let key = evaluation.attachment(req.attachment_id)?.key.clone();
    state.store().delete(&key).await?;

    let (_, attachment) = repo::modify_evaluation(&state, req.evaluation_id, |evaluation| {
        Ok(evaluation.remove_attachment(req.attachment_id, now())?)
    })
    .await?;

    AuditEvent::new(
        AuditAction::Delete,
        ResourceType::Attachment,
        attachment.id,
        &user.sub,
    )
    .with_details(serde_json::json!({ "evaluation_id": req.evaluation_id }))
    .emit();
    Ok(StatusCode::NO_CONTENT)
}
