#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use oftalmo_api::config::ApiConfig;
use oftalmo_api::state::AppState;
use oftalmo_storage::error::StorageError;
use oftalmo_storage::store::{BoxFuture, GetObjectOutput, MemoryStore, RecordStore};

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    /// The backing objects, read and written without fault injection.
    pub store: Arc<MemoryStore>,
    pub faults: Arc<FaultyStore>,
    pub token: String,
}

/// [`MemoryStore`] wrapper the router talks to, with switchable faults.
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    /// Every read is followed by another writer saving the same record, so
    /// the ETag a handler read is already stale when it writes back.
    pub concurrent_writer: AtomicBool,
    pub presign_fails: AtomicBool,
    pub delete_fails: AtomicBool,
}

impl FaultyStore {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            concurrent_writer: AtomicBool::new(false),
            presign_fails: AtomicBool::new(false),
            delete_fails: AtomicBool::new(false),
        }
    }

    fn backend_down(op: &'static str) -> StorageError {
        StorageError::Backend {
            op,
            message: "connection reset".to_string(),
        }
    }
}

impl RecordStore for FaultyStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>> {
        Box::pin(async move {
            let out = self.inner.get(key).await?;
            if self.concurrent_writer.load(Ordering::SeqCst) {
                self.inner
                    .put(key, out.body.clone(), out.content_type.as_deref())
                    .await?;
            }
            Ok(out)
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        self.inner.put(key, body, content_type)
    }

    fn put_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        self.inner.put_if_match(key, body, content_type, expected_etag)
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        if self.delete_fails.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Self::backend_down("delete")) });
        }
        self.inner.delete(key)
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        self.inner.list(prefix)
    }

    fn presign_get<'a>(
        &'a self,
        key: &'a str,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        if self.presign_fails.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Self::backend_down("presign_get")) });
        }
        self.inner.presign_get(key, expires_in)
    }

    fn presign_put<'a>(
        &'a self,
        key: &'a str,
        content_type: Option<&'a str>,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        if self.presign_fails.load(Ordering::SeqCst) {
            return Box::pin(async { Err(Self::backend_down("presign_put")) });
        }
        self.inner.presign_put(key, content_type, expires_in)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub fn config() -> ApiConfig {
    ApiConfig::from_lookup(|name| match name {
        "OFTALMO_JWT_SECRET" => Some(SECRET.to_string()),
        "OFTALMO_STORE" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let faults = Arc::new(FaultyStore::new(store.clone()));
        let shared: Arc<dyn RecordStore> = faults.clone();
        let router = oftalmo_api::router(AppState::new(shared, &config()));
        let token = oftalmo_auth::jwt::issue_token(SECRET.as_bytes(), "dr-test", None, 3600).unwrap();
        Self {
            router,
            store,
            faults,
            token,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with(method, uri, body, &[]).await
    }

    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        extra: &[(header::HeaderName, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        for (name, value) in extra {
            builder = builder.header(name.clone(), *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let response = self.post(uri, body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&response.body));
        response.json()
    }

    pub async fn create_patient(&self, name: &str, medical_record: &str) -> Value {
        self.create(
            "/patients",
            serde_json::json!({
                "name": name,
                "medical_record": medical_record,
                "cpf": "529.982.247-25",
                "birth_date": "1970-03-15",
                "sex": "female",
            }),
        )
        .await
    }

    pub async fn create_collaborator(&self, name: &str) -> Value {
        self.create(
            "/collaborators",
            serde_json::json!({
                "name": name,
                "email": format!("{}@hospital.example", name.to_lowercase().replace(' ', ".")),
                "role": "resident",
            }),
        )
        .await
    }

    pub async fn create_clinic(&self, name: &str) -> Value {
        self.create("/clinics", serde_json::json!({ "name": name })).await
    }

    /// A patient, a clinic and an open evaluation tying them together.
    pub async fn evaluation_fixture(&self) -> (Value, Value, Value) {
        let patient = self.create_patient("Maria Souza", "MR-1").await;
        let clinic = self.create_clinic("Glaucoma").await;
        let collaborator = self.create_collaborator("Ana Lima").await;
        let evaluation = self
            .create(
                &format!("/patients/{}/evaluations", patient["id"].as_str().unwrap()),
                serde_json::json!({
                    "clinic_id": clinic["id"],
                    "collaborator_ids": [collaborator["id"]],
                    "date": "2024-06-01",
                    "chief_complaint": "Blurred vision",
                }),
            )
            .await;
        (patient, clinic, evaluation)
    }
}
