use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::attachment::Attachment;
use super::double_option;
use super::eye::Eye;
use super::patient::non_blank;
use super::refraction::Refraction;
use super::surgery::Surgery;
use crate::error::CoreError;
use crate::eye_logs::{self, EyeLogsPatch};

/// A single clinical visit, holding exam data for both eyes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub collaborator_ids: Vec<Uuid>,
    pub date: jiff::civil::Date,
    pub status: EvaluationStatus,
    pub chief_complaint: Option<String>,
    pub history: Option<String>,
    pub past_history: Option<String>,
    pub family_history: Option<String>,
    pub medications: Option<String>,
    pub eye_logs: Vec<EyeLog>,
    pub refractions: Vec<Refraction>,
    pub surgeries: Vec<Surgery>,
    pub attachments: Vec<Attachment>,
    pub diagnosis: Option<String>,
    pub plan: Option<String>,
    pub notes: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationStatus {
    Open,
    Finalized,
}

/// The exam sections recorded per eye. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EyeLogKind {
    Biomicroscopy,
    Fundoscopy,
    Tonometry,
    Gonioscopy,
    Pachymetry,
    OcularMotility,
    PupillaryReflexes,
    Keratometry,
}

impl EyeLogKind {
    pub const ALL: [EyeLogKind; 8] = [
        EyeLogKind::Biomicroscopy,
        EyeLogKind::Fundoscopy,
        EyeLogKind::Tonometry,
        EyeLogKind::Gonioscopy,
        EyeLogKind::Pachymetry,
        EyeLogKind::OcularMotility,
        EyeLogKind::PupillaryReflexes,
        EyeLogKind::Keratometry,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            EyeLogKind::Biomicroscopy => "biomicroscopy",
            EyeLogKind::Fundoscopy => "fundoscopy",
            EyeLogKind::Tonometry => "tonometry",
            EyeLogKind::Gonioscopy => "gonioscopy",
            EyeLogKind::Pachymetry => "pachymetry",
            EyeLogKind::OcularMotility => "ocular_motility",
            EyeLogKind::PupillaryReflexes => "pupillary_reflexes",
            EyeLogKind::Keratometry => "keratometry",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EyeLogKind::Biomicroscopy => "Biomicroscopy",
            EyeLogKind::Fundoscopy => "Fundoscopy",
            EyeLogKind::Tonometry => "Tonometry",
            EyeLogKind::Gonioscopy => "Gonioscopy",
            EyeLogKind::Pachymetry => "Pachymetry",
            EyeLogKind::OcularMotility => "Ocular motility",
            EyeLogKind::PupillaryReflexes => "Pupillary reflexes",
            EyeLogKind::Keratometry => "Keratometry",
        }
    }
}

/// One exam finding for one eye, unique per `(eye, kind)` within an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EyeLog {
    pub eye: Eye,
    pub kind: EyeLogKind,
    pub value: String,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationInput {
    pub clinic_id: Uuid,
    #[serde(default)]
    pub collaborator_ids: Vec<Uuid>,
    pub date: jiff::civil::Date,
    #[serde(default)]
    pub chief_complaint: Option<String>,
}

/// Partial update of an open evaluation.
///
/// Text fields use a double option: absent leaves the field alone, `null`
/// clears it and a string replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationUpdate {
    #[serde(default)]
    pub date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub collaborator_ids: Option<Vec<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub chief_complaint: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub history: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub past_history: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub family_history: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub medications: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub diagnosis: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub plan: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub eye_logs: Option<EyeLogsPatch>,
}

impl Evaluation {
    pub fn from_input(patient_id: Uuid, input: EvaluationInput, now: jiff::Timestamp) -> Self {
        let mut collaborator_ids = Vec::new();
        for id in input.collaborator_ids {
            if !collaborator_ids.contains(&id) {
                collaborator_ids.push(id);
            }
        }

        Self {
            id: Uuid::new_v4(),
            patient_id,
            clinic_id: input.clinic_id,
            collaborator_ids,
            date: input.date,
            status: EvaluationStatus::Open,
            chief_complaint: non_blank(input.chief_complaint),
            history: None,
            past_history: None,
            family_history: None,
            medications: None,
            eye_logs: Vec::new(),
            refractions: Vec::new(),
            surgeries: Vec::new(),
            attachments: Vec::new(),
            diagnosis: None,
            plan: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == EvaluationStatus::Finalized
    }

    /// Reject any mutation of a finalized evaluation.
    pub fn ensure_open(&self) -> Result<(), CoreError> {
        if self.is_finalized() {
            return Err(CoreError::EvaluationFinalized(self.id));
        }
        Ok(())
    }

    /// Apply a partial update in place.
    pub fn apply_update(
        &mut self,
        update: EvaluationUpdate,
        now: jiff::Timestamp,
    ) -> Result<(), CoreError> {
        self.ensure_open()?;
        update.validate()?;

        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(ids) = update.collaborator_ids {
            self.collaborator_ids.clear();
            for id in ids {
                if !self.collaborator_ids.contains(&id) {
                    self.collaborator_ids.push(id);
                }
            }
        }

        let text_fields = [
            (&mut self.chief_complaint, update.chief_complaint),
            (&mut self.history, update.history),
            (&mut self.past_history, update.past_history),
            (&mut self.family_history, update.family_history),
            (&mut self.medications, update.medications),
            (&mut self.diagnosis, update.diagnosis),
            (&mut self.plan, update.plan),
            (&mut self.notes, update.notes),
        ];
        for (field, change) in text_fields {
            if let Some(value) = change {
                *field = non_blank(value);
            }
        }

        if let Some(patch) = &update.eye_logs {
            eye_logs::apply_eye_logs(&mut self.eye_logs, patch, now);
        }

        self.updated_at = now;
        Ok(())
    }

    pub fn eye_log(&self, eye: Eye, kind: EyeLogKind) -> Option<&EyeLog> {
        self.eye_logs
            .iter()
            .find(|log| log.eye == eye && log.kind == kind)
    }

    pub fn finalize(&mut self, now: jiff::Timestamp) {
        self.status = EvaluationStatus::Finalized;
        self.updated_at = now;
    }

    pub fn reopen(&mut self, now: jiff::Timestamp) {
        self.status = EvaluationStatus::Open;
        self.updated_at = now;
    }

    pub fn add_refraction(
        &mut self,
        refraction: Refraction,
        now: jiff::Timestamp,
    ) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.refractions.push(refraction);
        self.updated_at = now;
        Ok(())
    }

    pub fn remove_refraction(&mut self, id: Uuid, now: jiff::Timestamp) -> Result<Refraction, CoreError> {
        self.ensure_open()?;
        let pos = self
            .refractions
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::RefractionNotFound(id))?;
        self.updated_at = now;
        Ok(self.refractions.remove(pos))
    }

    pub fn add_surgery(&mut self, surgery: Surgery, now: jiff::Timestamp) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.surgeries.push(surgery);
        self.updated_at = now;
        Ok(())
    }

    pub fn remove_surgery(&mut self, id: Uuid, now: jiff::Timestamp) -> Result<Surgery, CoreError> {
        self.ensure_open()?;
        let pos = self
            .surgeries
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::SurgeryNotFound(id))?;
        self.updated_at = now;
        Ok(self.surgeries.remove(pos))
    }

    pub fn add_attachment(
        &mut self,
        attachment: Attachment,
        now: jiff::Timestamp,
    ) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.attachments.push(attachment);
        self.updated_at = now;
        Ok(())
    }

    pub fn attachment(&self, id: Uuid) -> Result<&Attachment, CoreError> {
        self.attachments
            .iter()
            .find(|a| a.id == id)
            .ok_or(CoreError::AttachmentNotFound(id))
    }

    pub fn confirm_attachment(
        &mut self,
        id: Uuid,
        now: jiff::Timestamp,
    ) -> Result<&Attachment, CoreError> {
        self.ensure_open()?;
        let attachment = self
            .attachments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(CoreError::AttachmentNotFound(id))?;
        attachment.uploaded = true;
        self.updated_at = now;
        Ok(attachment)
    }

    pub fn remove_attachment(
        &mut self,
        id: Uuid,
        now: jiff::Timestamp,
    ) -> Result<Attachment, CoreError> {
        self.ensure_open()?;
        let pos = self
            .attachments
            .iter()
            .position(|a| a.id == id)
            .ok_or(CoreError::AttachmentNotFound(id))?;
        self.updated_at = now;
        Ok(self.attachments.remove(pos))
    }
}
