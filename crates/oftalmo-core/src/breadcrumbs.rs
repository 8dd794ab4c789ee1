//! Path to breadcrumb trail matching for the web client.

use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

/// Route patterns and their labels. A `:` segment matches any one segment.
/// Literal routes come before parameterized siblings; the first match wins.
const ROUTES: &[(&str, &str)] = &[
    ("/patients", "Patients"),
    ("/patients/new", "New patient"),
    ("/patients/:id", "Patient"),
    ("/patients/:id/edit", "Edit"),
    ("/patients/:id/evaluations", "Evaluations"),
    ("/patients/:id/evaluations/new", "New evaluation"),
    ("/patients/:id/evaluations/:id", "Evaluation"),
    ("/patients/:id/evaluations/:id/summary", "Summary"),
    ("/clinics", "Clinics"),
    ("/clinics/new", "New clinic"),
    ("/clinics/:id", "Clinic"),
    ("/clinics/:id/edit", "Edit"),
    ("/collaborators", "Collaborators"),
    ("/collaborators/new", "New collaborator"),
    ("/collaborators/:id", "Collaborator"),
    ("/collaborators/:id/edit", "Edit"),
    ("/settings", "Settings"),
];

const HOME: &str = "Home";

/// Build the breadcrumb trail for `path`.
///
/// Query string, fragment, empty segments and trailing slashes are ignored.
/// Every cumulative prefix of the path is looked up in the route table and
/// prefixes with no matching route are skipped. The trail always starts
/// with the home crumb.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut trail = vec![Breadcrumb {
        label: HOME.to_string(),
        href: "/".to_string(),
    }];

    for end in 1..=segments.len() {
        let prefix = &segments[..end];
        if let Some(label) = match_route(prefix) {
            trail.push(Breadcrumb {
                label: label.to_string(),
                href: format!("/{}", prefix.join("/")),
            });
        }
    }

    trail
}

fn match_route(segments: &[&str]) -> Option<&'static str> {
    ROUTES
        .iter()
        .find(|(pattern, _)| pattern_matches(pattern, segments))
        .map(|(_, label)| *label)
}

fn pattern_matches(pattern: &str, segments: &[&str]) -> bool {
    let mut parts = pattern.split('/').filter(|s| !s.is_empty());
    for segment in segments {
        match parts.next() {
            Some(p) if p.starts_with(':') => {}
            Some(p) if p == *segment => {}
            _ => return false,
        }
    }
    parts.next().is_none()
}
