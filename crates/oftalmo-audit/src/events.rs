use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Finalize,
    Reopen,
    Export,
    RequestUpload,
    RequestDownload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Patient,
    Collaborator,
    Clinic,
    Evaluation,
    Attachment,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Finalize => "finalize",
            AuditAction::Reopen => "reopen",
            AuditAction::Export => "export",
            AuditAction::RequestUpload => "request_upload",
            AuditAction::RequestDownload => "request_download",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceType::Patient => "patient",
            ResourceType::Collaborator => "collaborator",
            ResourceType::Clinic => "clinic",
            ResourceType::Evaluation => "evaluation",
            ResourceType::Attachment => "attachment",
        };
        f.write_str(s)
    }
}

/// A structured audit event for an action on a clinical record.
///
/// Events are logged via `tracing` under the `audit` target so they can be
/// routed separately from request logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub user_sub: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: impl ToString,
        user_sub: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.to_string(),
            user_sub: user_sub.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self.details.as_ref().map(|d| d.to_string());
        tracing::event!(
            target: "audit",
            tracing::Level::INFO,
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.user_sub = %self.user_sub,
            audit.details = details.as_deref(),
            "audit event"
        );
    }
}
