//! Flattened, display-ready view of an evaluation used as template context.

use serde::Serialize;

use oftalmo_core::cpf;
use oftalmo_core::models::clinic::Clinic;
use oftalmo_core::models::collaborator::{Collaborator, CollaboratorRole};
use oftalmo_core::models::evaluation::{Evaluation, EvaluationStatus, EyeLogKind};
use oftalmo_core::models::eye::Eye;
use oftalmo_core::models::patient::{Patient, Sex};
use oftalmo_core::models::refraction::{Refraction, RefractionKind};
use oftalmo_core::refraction::best_refractions;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryContext {
    pub patient: PatientLine,
    pub clinic: Option<String>,
    pub collaborators: Vec<String>,
    pub date: String,
    pub status: &'static str,
    pub anamnesis: Vec<Section>,
    pub eyes: Vec<EyeSection>,
    pub refractions: Vec<String>,
    pub surgeries: Vec<String>,
    pub attachments: Vec<String>,
    pub conclusion: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientLine {
    pub name: String,
    pub medical_record: String,
    pub cpf: Option<String>,
    pub age: Option<i16>,
    pub sex: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EyeSection {
    pub label: &'static str,
    pub abbreviation: &'static str,
    pub findings: Vec<Section>,
    pub best_refraction: Option<String>,
}

impl SummaryContext {
    pub fn new(
        evaluation: &Evaluation,
        patient: &Patient,
        clinic: Option<&Clinic>,
        collaborators: &[Collaborator],
    ) -> Self {
        let age = evaluation
            .date
            .since((jiff::Unit::Year, patient.birth_date))
            .ok()
            .map(|span| span.get_years());

        let best = best_refractions(&evaluation.refractions);
        let eyes = Eye::ALL
            .into_iter()
            .map(|eye| EyeSection {
                label: eye.label(),
                abbreviation: eye.abbreviation(),
                findings: EyeLogKind::ALL
                    .into_iter()
                    .filter_map(|kind| {
                        evaluation.eye_log(eye, kind).map(|log| Section {
                            title: kind.label(),
                            text: log.value.clone(),
                        })
                    })
                    .collect(),
                best_refraction: best.for_eye(eye).map(format_refraction),
            })
            .collect();

        Self {
            patient: PatientLine {
                name: patient.name.clone(),
                medical_record: patient.medical_record.clone(),
                cpf: patient.cpf.as_deref().map(cpf::format),
                age,
                sex: match patient.sex {
                    Sex::Female => "Female",
                    Sex::Male => "Male",
                    Sex::Other => "Other",
                },
            },
            clinic: clinic.map(|c| c.name.clone()),
            collaborators: collaborators.iter().map(collaborator_line).collect(),
            date: evaluation.date.to_string(),
            status: match evaluation.status {
                EvaluationStatus::Open => "Open",
                EvaluationStatus::Finalized => "Finalized",
            },
            anamnesis: sections(&[
                ("Chief complaint", &evaluation.chief_complaint),
                ("History of present illness", &evaluation.history),
                ("Past medical history", &evaluation.past_history),
                ("Family history", &evaluation.family_history),
                ("Medications", &evaluation.medications),
            ]),
            eyes,
            refractions: evaluation.refractions.iter().map(format_refraction).collect(),
            surgeries: evaluation
                .surgeries
                .iter()
                .map(|s| {
                    let mut line =
                        format!("{}: {} ({})", s.eye.abbreviation(), s.procedure, s.date);
                    if let Some(surgeon) = &s.surgeon {
                        line.push_str(&format!(", {surgeon}"));
                    }
                    line
                })
                .collect(),
            attachments: evaluation
                .attachments
                .iter()
                .filter(|a| a.uploaded)
                .map(|a| match a.eye {
                    Some(eye) => format!("{} {}: {}", a.kind.label(), eye.abbreviation(), a.filename),
                    None => format!("{}: {}", a.kind.label(), a.filename),
                })
                .collect(),
            conclusion: sections(&[
                ("Diagnosis", &evaluation.diagnosis),
                ("Plan", &evaluation.plan),
                ("Notes", &evaluation.notes),
            ]),
        }
    }
}

/// Keep only the fields that have a value, in the given order.
fn sections(fields: &[(&'static str, &Option<String>)]) -> Vec<Section> {
    fields
        .iter()
        .filter_map(|&(title, value)| {
            value.as_ref().map(|text| Section {
                title,
                text: text.clone(),
            })
        })
        .collect()
}

fn collaborator_line(c: &Collaborator) -> String {
    let role = match c.role {
        CollaboratorRole::Staff => "staff",
        CollaboratorRole::Resident => "resident",
    };
    match &c.crm {
        Some(crm) => format!("{} ({role}, CRM {crm})", c.name),
        None => format!("{} ({role})", c.name),
    }
}

/// `OD: -2.25 -0.75 x 180° | VA 20/20 (static)`; pure spheres print as `DS`.
pub fn format_refraction(r: &Refraction) -> String {
    let kind = match r.kind {
        RefractionKind::Static => "static",
        RefractionKind::Dynamic => "dynamic",
        RefractionKind::Cycloplegic => "cycloplegic",
    };
    let lens = if r.cylinder == 0.0 {
        format!("{:+.2} DS", r.spherical)
    } else {
        format!("{:+.2} {:+.2} x {}°", r.spherical, r.cylinder, r.axis)
    };
    format!(
        "{}: {lens} | VA {} ({kind})",
        r.eye.abbreviation(),
        r.visual_acuity
    )
}
