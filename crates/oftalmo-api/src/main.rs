use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use oftalmo_api::config::{ApiConfig, StoreBackend};
use oftalmo_api::state::AppState;
use oftalmo_storage::store::{MemoryStore, RecordStore, S3Store};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let store: Arc<dyn RecordStore> = match config.store {
        StoreBackend::S3 => {
            let client = oftalmo_storage::client::build_client_with_region(&config.region).await;
            Arc::new(S3Store::new(client, config.bucket.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; records will not survive a restart");
            Arc::new(MemoryStore::new(config.bucket.clone()))
        }
    };

    tracing::info!(
        bucket = %config.bucket,
        region = %config.region,
        presign_ttl_secs = config.presign_ttl.as_secs(),
        "starting oftalmo api"
    );

    let app = oftalmo_api::router(AppState::new(store, &config));

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
