use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::eye::Eye;
use crate::keys;

/// An imaging file attached to an evaluation. The bytes live in object
/// storage under `key`; this record only tracks metadata.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attachment {
    pub id: Uuid,
    pub eye: Option<Eye>,
    pub kind: AttachmentKind,
    pub filename: String,
    pub content_type: String,
    pub key: String,
    /// Set once the client confirms the presigned upload finished.
    pub uploaded: bool,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AttachmentKind {
    Retinography,
    Oct,
    VisualField,
    Topography,
    Ultrasound,
    Other,
}

impl AttachmentKind {
    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Retinography => "Retinography",
            AttachmentKind::Oct => "OCT",
            AttachmentKind::VisualField => "Visual field",
            AttachmentKind::Topography => "Topography",
            AttachmentKind::Ultrasound => "Ultrasound",
            AttachmentKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttachmentInput {
    #[serde(default)]
    pub eye: Option<Eye>,
    pub kind: AttachmentKind,
    pub filename: String,
    pub content_type: String,
}

impl Attachment {
    pub fn from_input(evaluation_id: Uuid, input: AttachmentInput, now: jiff::Timestamp) -> Self {
        let id = Uuid::new_v4();
        let filename = input.filename.trim().to_string();
        Self {
            id,
            eye: input.eye,
            kind: input.kind,
            key: keys::attachment(evaluation_id, id, &filename),
            filename,
            content_type: input.content_type.trim().to_string(),
            uploaded: false,
            created_at: now,
        }
    }
}
