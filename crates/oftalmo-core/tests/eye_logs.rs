use jiff::Timestamp;

use oftalmo_core::eye_logs::{apply_eye_logs, EyeLogsPatch};
use oftalmo_core::models::evaluation::{EyeLog, EyeLogKind};
use oftalmo_core::models::eye::Eye;

fn ts(secs: i64) -> Timestamp {
    Timestamp::from_second(secs).unwrap()
}

#[test]
fn inserts_new_logs_in_stable_order() {
    let mut logs = Vec::new();
    let mut patch = EyeLogsPatch::default();
    patch
        .set(Eye::Left, EyeLogKind::Tonometry, "14 mmHg")
        .set(Eye::Right, EyeLogKind::Fundoscopy, "C/D 0.3")
        .set(Eye::Right, EyeLogKind::Biomicroscopy, "  clear cornea ");

    let changes = apply_eye_logs(&mut logs, &patch, ts(10));

    assert_eq!(changes.inserted, 3);
    let keys: Vec<_> = logs.iter().map(|l| (l.eye, l.kind)).collect();
    assert_eq!(
        keys,
        vec![
            (Eye::Right, EyeLogKind::Biomicroscopy),
            (Eye::Right, EyeLogKind::Fundoscopy),
            (Eye::Left, EyeLogKind::Tonometry),
        ]
    );
    assert_eq!(logs[0].value, "clear cornea");
}

#[test]
fn updates_removes_and_leaves_untouched() {
    let mut logs = vec![
        EyeLog {
            eye: Eye::Right,
            kind: EyeLogKind::Tonometry,
            value: "12 mmHg".to_string(),
            updated_at: ts(1),
        },
        EyeLog {
            eye: Eye::Right,
            kind: EyeLogKind::Fundoscopy,
            value: "normal".to_string(),
            updated_at: ts(1),
        },
        EyeLog {
            eye: Eye::Left,
            kind: EyeLogKind::Tonometry,
            value: "13 mmHg".to_string(),
            updated_at: ts(1),
        },
    ];

    let mut patch = EyeLogsPatch::default();
    patch
        .set(Eye::Right, EyeLogKind::Tonometry, "18 mmHg")
        .set(Eye::Right, EyeLogKind::Fundoscopy, "   ")
        .set(Eye::Left, EyeLogKind::Tonometry, "13 mmHg");

    let changes = apply_eye_logs(&mut logs, &patch, ts(20));

    assert_eq!(changes.updated, 1);
    assert_eq!(changes.removed, 1);
    assert_eq!(changes.inserted, 0);
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].value, "18 mmHg");
    assert_eq!(logs[0].updated_at, ts(20));
    // Unchanged value keeps its timestamp.
    assert_eq!(logs[1].updated_at, ts(1));
}

#[test]
fn blank_value_for_missing_log_is_a_no_op() {
    let mut logs = Vec::new();
    let mut patch = EyeLogsPatch::default();
    patch.set(Eye::Left, EyeLogKind::Gonioscopy, "");
    let changes = apply_eye_logs(&mut logs, &patch, ts(5));
    assert_eq!(changes.total(), 0);
    assert!(logs.is_empty());
}

#[test]
fn patch_deserializes_from_kind_keyed_maps() {
    let patch: EyeLogsPatch = serde_json::from_str(
        r#"{"right": {"biomicroscopy": "ok", "ocular_motility": "full"}}"#,
    )
    .unwrap();
    assert_eq!(patch.right.len(), 2);
    assert!(patch.left.is_empty());
    assert_eq!(patch.right[&EyeLogKind::OcularMotility], "full");
}
