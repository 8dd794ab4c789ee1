use std::sync::Arc;
use std::time::Duration;

use oftalmo_auth::jwt::TokenVerifier;
use oftalmo_storage::store::RecordStore;

use crate::config::ApiConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub verifier: TokenVerifier,
    pub presign_ttl: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &ApiConfig) -> Self {
        Self {
            store,
            verifier: TokenVerifier::new(
                config.jwt_secret.as_bytes(),
                config.jwt_issuer.as_deref(),
            ),
            presign_ttl: config.presign_ttl,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}
