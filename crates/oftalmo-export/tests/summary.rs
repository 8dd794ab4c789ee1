use jiff::civil::date;
use jiff::Timestamp;
use uuid::Uuid;

use oftalmo_core::eye_logs::EyeLogsPatch;
use oftalmo_core::models::attachment::{Attachment, AttachmentInput, AttachmentKind};
use oftalmo_core::models::clinic::{Clinic, ClinicInput};
use oftalmo_core::models::collaborator::{Collaborator, CollaboratorInput, CollaboratorRole};
use oftalmo_core::models::evaluation::{Evaluation, EvaluationInput, EvaluationUpdate, EyeLogKind};
use oftalmo_core::models::eye::Eye;
use oftalmo_core::models::patient::{Patient, PatientInput, Sex};
use oftalmo_core::models::refraction::{Refraction, RefractionInput, RefractionKind};
use oftalmo_export::docx::generate_docx;
use oftalmo_export::error::ExportError;
use oftalmo_export::render::{render_summary, render_template};
use oftalmo_export::styles::DocumentStyles;
use oftalmo_export::summary::SummaryContext;

fn now() -> Timestamp {
    Timestamp::UNIX_EPOCH
}

fn fixture() -> (Evaluation, Patient, Clinic, Vec<Collaborator>) {
    let patient = Patient::from_input(
        PatientInput {
            name: "João Pereira".to_string(),
            medical_record: "HC-778".to_string(),
            cpf: Some("52998224725".to_string()),
            birth_date: date(1960, 6, 10),
            sex: Sex::Male,
            phone: None,
            email: None,
            address: None,
            notes: None,
        },
        now(),
    );
    let clinic = Clinic::from_input(
        ClinicInput {
            name: "Glaucoma".to_string(),
            description: None,
            collaborator_ids: Vec::new(),
        },
        now(),
    );
    let resident = Collaborator::from_input(
        CollaboratorInput {
            name: "Dra. Beatriz".to_string(),
            email: "bea@hospital.org".to_string(),
            role: CollaboratorRole::Resident,
            crm: Some("12345".to_string()),
            active: true,
        },
        now(),
    );

    let mut evaluation = Evaluation::from_input(
        patient.id,
        EvaluationInput {
            clinic_id: clinic.id,
            collaborator_ids: vec![resident.id],
            date: date(2024, 6, 9),
            chief_complaint: Some("Low vision in the right eye".to_string()),
        },
        now(),
    );

    let mut patch = EyeLogsPatch::default();
    patch
        .set(Eye::Right, EyeLogKind::Tonometry, "24 mmHg")
        .set(Eye::Right, EyeLogKind::Fundoscopy, "C/D 0.8");
    evaluation
        .apply_update(
            EvaluationUpdate {
                diagnosis: Some(Some("Primary open-angle glaucoma".to_string())),
                eye_logs: Some(patch),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

    for (va, sph) in [("20/200", -1.0), ("20/40", -1.5)] {
        let r = Refraction::from_input(
            RefractionInput {
                eye: Eye::Right,
                kind: RefractionKind::Static,
                spherical: sph,
                cylinder: -0.75,
                axis: 180,
                visual_acuity: va.parse().unwrap(),
            },
            now(),
        );
        evaluation.add_refraction(r, now()).unwrap();
    }

    let mut oct = Attachment::from_input(
        evaluation.id,
        AttachmentInput {
            eye: Some(Eye::Right),
            kind: AttachmentKind::Oct,
            filename: "oct.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        },
        now(),
    );
    oct.uploaded = true;
    evaluation.add_attachment(oct, now()).unwrap();
    let pending = Attachment::from_input(
        evaluation.id,
        AttachmentInput {
            eye: None,
            kind: AttachmentKind::VisualField,
            filename: "pending.png".to_string(),
            content_type: "image/png".to_string(),
        },
        now(),
    );
    evaluation.add_attachment(pending, now()).unwrap();

    (evaluation, patient, clinic, vec![resident])
}

#[test]
fn summary_contains_every_section() {
    let (evaluation, patient, clinic, collaborators) = fixture();
    let context = SummaryContext::new(&evaluation, &patient, Some(&clinic), &collaborators);
    let text = render_summary(&context).unwrap();

    assert!(text.starts_with("# Ophthalmology evaluation\n"));
    assert!(text.contains("**Patient:** João Pereira"));
    assert!(text.contains("**CPF:** 529.982.247-25"));
    assert!(text.contains("**Age:** 63 years"));
    assert!(text.contains("**Clinic:** Glaucoma"));
    assert!(text.contains("- Dra. Beatriz (resident, CRM 12345)"));
    assert!(text.contains("**Chief complaint:** Low vision in the right eye"));
    assert!(text.contains("### Right eye (OD)"));
    assert!(text.contains("- **Tonometry:** 24 mmHg"));
    assert!(text.contains("- **Best refraction:** OD: -1.50 -0.75 x 180° | VA 20/40 (static)"));
    assert!(text.contains("### Left eye (OS)\n- No findings recorded."));
    assert!(text.contains("- OCT OD: oct.pdf"));
    assert!(!text.contains("pending.png"));
    assert!(text.contains("**Diagnosis:** Primary open-angle glaucoma"));
    assert!(!text.contains("\n\n\n"));
}

#[test]
fn empty_sections_are_omitted() {
    let (mut evaluation, patient, _clinic, _) = fixture();
    evaluation.refractions.clear();
    evaluation.attachments.clear();
    evaluation.diagnosis = None;
    evaluation.chief_complaint = None;

    let context = SummaryContext::new(&evaluation, &patient, None, &[]);
    let text = render_summary(&context).unwrap();

    assert!(!text.contains("## Refractions"));
    assert!(!text.contains("## Imaging"));
    assert!(!text.contains("## Conclusion"));
    assert!(!text.contains("## Anamnesis"));
    assert!(!text.contains("## Examiners"));
    assert!(!text.contains("**Clinic:**"));
}

#[test]
fn custom_template_and_parse_errors() {
    let (evaluation, patient, clinic, collaborators) = fixture();
    let context = SummaryContext::new(&evaluation, &patient, Some(&clinic), &collaborators);

    let text = render_template("short", "{{ patient.name }} / {{ date }}", &context).unwrap();
    assert_eq!(text, "João Pereira / 2024-06-09\n");

    let err = render_template("broken", "{% if %}", &context).unwrap_err();
    assert!(matches!(err, ExportError::TemplateParse(_)));
}

#[test]
fn docx_is_a_zip_package() {
    let (evaluation, patient, clinic, collaborators) = fixture();
    let context = SummaryContext::new(&evaluation, &patient, Some(&clinic), &collaborators);
    let text = render_summary(&context).unwrap();

    let bytes = generate_docx(&text, &DocumentStyles::default()).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn evaluation_without_id_references_still_renders() {
    let (mut evaluation, patient, _, _) = fixture();
    evaluation.collaborator_ids = vec![Uuid::new_v4()];
    let context = SummaryContext::new(&evaluation, &patient, None, &[]);
    assert!(render_summary(&context).is_ok());
}
