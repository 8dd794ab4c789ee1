//! Input schemas.
//!
//! Every `*Input` type accepted by the API has a `validate` method here that
//! collects all field problems at once instead of stopping at the first.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cpf;
use crate::eye_logs::EyeLogsPatch;
use crate::models::attachment::AttachmentInput;
use crate::models::clinic::ClinicInput;
use crate::models::collaborator::CollaboratorInput;
use crate::models::evaluation::{EvaluationInput, EvaluationUpdate};
use crate::models::patient::PatientInput;
use crate::models::refraction::RefractionInput;
use crate::models::surgery::SurgeryInput;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_TEXT_LEN: usize = 4000;

pub const SPHERICAL_RANGE: (f64, f64) = (-30.0, 30.0);
pub const CYLINDER_RANGE: (f64, f64) = (-10.0, 10.0);
pub const MAX_AXIS: u16 = 180;
/// Lens powers are prescribed in quarter diopters.
pub const DIOPTER_STEP: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Prefix every field name, used when validating a nested input.
    fn extend_nested(&mut self, prefix: &str, other: ValidationErrors) {
        for e in other.fields {
            self.push(format!("{prefix}.{}", e.field), e.message);
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid input")?;
        for (i, e) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn required(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "is required");
    } else if trimmed.chars().count() > max {
        errors.push(field, format!("must be at most {max} characters"));
    }
}

fn optional_text(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value
        && v.trim().chars().count() > max
    {
        errors.push(field, format!("must be at most {max} characters"));
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn is_quarter_step(value: f64) -> bool {
    let steps = value / DIOPTER_STEP;
    (steps - steps.round()).abs() < 1e-6
}

fn diopters(errors: &mut ValidationErrors, field: &str, value: f64, (min, max): (f64, f64)) {
    if !value.is_finite() || value < min || value > max {
        errors.push(field, format!("must be between {min:+.2} and {max:+.2}"));
    } else if !is_quarter_step(value) {
        errors.push(field, "must be a multiple of 0.25");
    }
}

impl PatientInput {
    /// Validate against `today` so the birth date check is deterministic.
    pub fn validate(&self, today: jiff::civil::Date) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "name", &self.name, MAX_NAME_LEN);
        required(&mut errors, "medical_record", &self.medical_record, 50);

        if let Some(raw) = self.cpf.as_deref().filter(|c| !c.trim().is_empty())
            && !cpf::is_valid(raw)
        {
            errors.push("cpf", "is not a valid CPF");
        }
        if self.birth_date > today {
            errors.push("birth_date", "cannot be in the future");
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty())
            && !is_valid_email(email)
        {
            errors.push("email", "is not a valid email address");
        }
        optional_text(&mut errors, "phone", self.phone.as_deref(), 40);
        optional_text(&mut errors, "address", self.address.as_deref(), MAX_NAME_LEN * 2);
        optional_text(&mut errors, "notes", self.notes.as_deref(), MAX_TEXT_LEN);
        errors.into_result()
    }
}

impl CollaboratorInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "name", &self.name, MAX_NAME_LEN);
        if self.email.trim().is_empty() {
            errors.push("email", "is required");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "is not a valid email address");
        }
        optional_text(&mut errors, "crm", self.crm.as_deref(), 20);
        errors.into_result()
    }
}

impl ClinicInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "name", &self.name, MAX_NAME_LEN);
        optional_text(&mut errors, "description", self.description.as_deref(), MAX_TEXT_LEN);
        errors.into_result()
    }
}

impl EvaluationInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        optional_text(
            &mut errors,
            "chief_complaint",
            self.chief_complaint.as_deref(),
            MAX_TEXT_LEN,
        );
        errors.into_result()
    }
}

impl EvaluationUpdate {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let text_fields = [
            ("chief_complaint", &self.chief_complaint),
            ("history", &self.history),
            ("past_history", &self.past_history),
            ("family_history", &self.family_history),
            ("medications", &self.medications),
            ("diagnosis", &self.diagnosis),
            ("plan", &self.plan),
            ("notes", &self.notes),
        ];
        for (field, value) in text_fields {
            optional_text(&mut errors, field, value.as_ref().and_then(|v| v.as_deref()), MAX_TEXT_LEN);
        }
        if let Some(patch) = &self.eye_logs
            && let Err(nested) = patch.validate()
        {
            errors.extend_nested("eye_logs", nested);
        }
        errors.into_result()
    }
}

impl EyeLogsPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (side, section) in [("right", &self.right), ("left", &self.left)] {
            for (kind, value) in section {
                if value.trim().chars().count() > MAX_TEXT_LEN {
                    errors.push(
                        format!("{side}.{}", kind.as_str()),
                        format!("must be at most {MAX_TEXT_LEN} characters"),
                    );
                }
            }
        }
        errors.into_result()
    }
}

impl RefractionInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        diopters(&mut errors, "spherical", self.spherical, SPHERICAL_RANGE);
        diopters(&mut errors, "cylinder", self.cylinder, CYLINDER_RANGE);
        if self.cylinder != 0.0 && self.axis > MAX_AXIS {
            errors.push("axis", format!("must be between 0 and {MAX_AXIS}"));
        }
        errors.into_result()
    }
}

impl SurgeryInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required(&mut errors, "procedure", &self.procedure, MAX_NAME_LEN);
        optional_text(&mut errors, "surgeon", self.surgeon.as_deref(), MAX_NAME_LEN);
        optional_text(&mut errors, "notes", self.notes.as_deref(), MAX_TEXT_LEN);
        errors.into_result()
    }
}

impl AttachmentInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let filename = self.filename.trim();
        if filename.is_empty() {
            errors.push("filename", "is required");
        } else if filename.contains(['/', '\\']) || filename.contains("..") {
            errors.push("filename", "must be a plain file name");
        } else if filename.chars().count() > MAX_NAME_LEN {
            errors.push("filename", format!("must be at most {MAX_NAME_LEN} characters"));
        }
        if self.content_type.trim().is_empty() {
            errors.push("content_type", "is required");
        }
        errors.into_result()
    }
}
