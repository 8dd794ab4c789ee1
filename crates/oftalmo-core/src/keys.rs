//! Object key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the
//! canonical layout of records and files in the Oftalmo bucket.

use uuid::Uuid;

pub const PATIENTS_PREFIX: &str = "patients/";
pub const COLLABORATORS_PREFIX: &str = "collaborators/";
pub const CLINICS_PREFIX: &str = "clinics/";
pub const EVALUATIONS_PREFIX: &str = "evaluations/";

pub fn patient(id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{id}.json")
}

pub fn collaborator(id: Uuid) -> String {
    format!("{COLLABORATORS_PREFIX}{id}.json")
}

pub fn clinic(id: Uuid) -> String {
    format!("{CLINICS_PREFIX}{id}.json")
}

pub fn evaluation(id: Uuid) -> String {
    format!("{EVALUATIONS_PREFIX}{id}.json")
}

/// All attachment objects of one evaluation live under this prefix.
pub fn evaluation_attachments_prefix(evaluation_id: Uuid) -> String {
    format!("attachments/{evaluation_id}/")
}

pub fn attachment(evaluation_id: Uuid, attachment_id: Uuid, filename: &str) -> String {
    format!("attachments/{evaluation_id}/{attachment_id}/{filename}")
}
