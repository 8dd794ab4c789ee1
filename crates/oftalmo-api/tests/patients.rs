mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::TestApp;
use oftalmo_storage::store::RecordStore;

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/patients")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_signature_is_unauthorized() {
    let mut app = TestApp::new();
    app.token = oftalmo_auth::jwt::issue_token(b"other-secret", "x", None, 60).unwrap();
    assert_eq!(app.get("/patients").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_fetch_patient() {
    let app = TestApp::new();
    let patient = app.create_patient("  Maria Souza ", "MR-1").await;
    assert_eq!(patient["name"], "Maria Souza");
    assert_eq!(patient["cpf"], "52998224725");

    let fetched = app
        .get(&format!("/patients/{}", patient["id"].as_str().unwrap()))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["medical_record"], "MR-1");
}

#[tokio::test]
async fn invalid_patient_reports_every_field() {
    let app = TestApp::new();
    let response = app
        .post(
            "/patients",
            json!({
                "name": " ",
                "medical_record": "MR-9",
                "cpf": "111.111.111-11",
                "birth_date": "2999-01-01",
                "sex": "male",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.json();
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"cpf"));
    assert!(fields.contains(&"birth_date"));
}

#[tokio::test]
async fn duplicate_medical_record_conflicts() {
    let app = TestApp::new();
    app.create_patient("Maria Souza", "MR-1").await;
    let response = app
        .post(
            "/patients",
            json!({
                "name": "João Silva",
                "medical_record": "mr-1",
                "birth_date": "1980-01-01",
                "sex": "male",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_is_sorted_and_filterable() {
    let app = TestApp::new();
    app.create_patient("Zélia Prado", "MR-3").await;
    app.create_patient("ana Costa", "MR-2").await;
    app.create_patient("Bruno Alves", "MR-1").await;

    let all = app.get("/patients").await.json();
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["ana Costa", "Bruno Alves", "Zélia Prado"]);

    let filtered = app.get("/patients?q=mr-2").await.json();
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["name"], "ana Costa");
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = TestApp::new();
    let patient = app.create_patient("Maria Souza", "MR-1").await;
    let uri = format!("/patients/{}", patient["id"].as_str().unwrap());

    let response = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({
                "name": "Maria S. Souza",
                "medical_record": "MR-1",
                "birth_date": "1970-03-15",
                "sex": "female",
                "phone": "+55 11 99999-0000",
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["name"], "Maria S. Souza");
    assert_eq!(body["cpf"], serde_json::Value::Null);
    assert_eq!(body["phone"], "+55 11 99999-0000");
}

#[tokio::test]
async fn missing_patient_is_not_found() {
    let app = TestApp::new();
    let response = app.get(&format!("/patients/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_to_evaluations_and_files() {
    let app = TestApp::new();
    let (patient, _, evaluation) = app.evaluation_fixture().await;
    let evaluation_id = evaluation["id"].as_str().unwrap();

    let ticket = app
        .post(
            "/rpc/attachment.requestUpload",
            json!({
                "evaluation_id": evaluation_id,
                "kind": "oct",
                "filename": "oct.pdf",
                "content_type": "application/pdf",
            }),
        )
        .await
        .json();
    let key = ticket["attachment"]["key"].as_str().unwrap().to_string();
    app.store.put(&key, b"%PDF".to_vec(), None).await.unwrap();

    let response = app
        .send(
            Method::DELETE,
            &format!("/patients/{}", patient["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.get(&format!("/evaluations/{evaluation_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert!(app.store.get(&key).await.is_err());
}

#[tokio::test]
async fn breadcrumbs_resolve_paths() {
    let app = TestApp::new();
    let body = app.get("/breadcrumbs?path=/patients/new").await.json();
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["Home", "Patients", "New patient"]);
}

#[tokio::test]
async fn session_cookie_selects_collaborator() {
    let app = TestApp::new();
    let collaborator = app.create_collaborator("Ana Lima").await;
    let id = collaborator["id"].as_str().unwrap();

    let response = app
        .send(
            Method::PUT,
            "/session/collaborator",
            Some(json!({ "collaborator_id": id })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("oftalmo_collaborator={id}")));

    let cookie_header = format!("oftalmo_collaborator={id}");
    let selected = app
        .send_with(
            Method::GET,
            "/session/collaborator",
            None,
            &[(header::COOKIE, cookie_header.as_str())],
        )
        .await;
    assert_eq!(selected.status, StatusCode::OK);
    assert_eq!(selected.json()["id"], id);

    assert_eq!(
        app.get("/session/collaborator").await.status,
        StatusCode::NOT_FOUND
    );

    let cleared = app.send(Method::DELETE, "/session/collaborator", None).await;
    assert_eq!(cleared.status, StatusCode::NO_CONTENT);
    assert!(cleared.headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));
}
