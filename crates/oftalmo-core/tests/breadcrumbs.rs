use oftalmo_core::breadcrumbs::breadcrumbs;

fn labels(path: &str) -> Vec<String> {
    breadcrumbs(path).into_iter().map(|b| b.label).collect()
}

#[test]
fn root_is_just_home() {
    let trail = breadcrumbs("/");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].label, "Home");
    assert_eq!(trail[0].href, "/");
}

#[test]
fn nested_evaluation_path() {
    let trail = breadcrumbs("/patients/abc/evaluations/def/summary");
    let pairs: Vec<(&str, &str)> = trail
        .iter()
        .map(|b| (b.label.as_str(), b.href.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Home", "/"),
            ("Patients", "/patients"),
            ("Patient", "/patients/abc"),
            ("Evaluations", "/patients/abc/evaluations"),
            ("Evaluation", "/patients/abc/evaluations/def"),
            ("Summary", "/patients/abc/evaluations/def/summary"),
        ]
    );
}

#[test]
fn literal_routes_win_over_parameters() {
    assert_eq!(labels("/patients/new"), vec!["Home", "Patients", "New patient"]);
    assert_eq!(labels("/clinics/42/edit"), vec!["Home", "Clinics", "Clinic", "Edit"]);
}

#[test]
fn query_fragment_and_trailing_slash_are_ignored() {
    assert_eq!(
        labels("/collaborators/?role=resident#top"),
        vec!["Home", "Collaborators"]
    );
    assert_eq!(labels("//patients//x/"), vec!["Home", "Patients", "Patient"]);
}

#[test]
fn unknown_prefixes_are_skipped() {
    assert_eq!(labels("/unknown/patients"), vec!["Home"]);
    assert_eq!(labels("/settings/profile"), vec!["Home", "Settings"]);
}
