use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("evaluation {0} is finalized")]
    EvaluationFinalized(Uuid),

    #[error("refraction not found: {0}")]
    RefractionNotFound(Uuid),

    #[error("surgery not found: {0}")]
    SurgeryNotFound(Uuid),

    #[error("attachment not found: {0}")]
    AttachmentNotFound(Uuid),

    #[error("invalid visual acuity: {0}")]
    InvalidVisualAcuity(String),
}
