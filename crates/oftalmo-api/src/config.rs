use std::env;
use std::time::Duration;

/// Presigned URLs may live between one minute and the seven-day S3 maximum.
const MIN_PRESIGN_SECS: u64 = 60;
const MAX_PRESIGN_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_PRESIGN_SECS: u64 = 15 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    /// In-process store; data is lost on restart.
    Memory,
}

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bucket: String,
    pub region: String,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub presign_ttl: Duration,
    pub store: StoreBackend,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("OFTALMO_JWT_SECRET")
            .ok_or_else(|| eyre::eyre!("OFTALMO_JWT_SECRET must be set"))?;

        let presign_secs = match var("OFTALMO_PRESIGN_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| eyre::eyre!("invalid OFTALMO_PRESIGN_TTL_SECS {raw:?}: {e}"))?,
            None => DEFAULT_PRESIGN_SECS,
        };
        if !(MIN_PRESIGN_SECS..=MAX_PRESIGN_SECS).contains(&presign_secs) {
            return Err(eyre::eyre!(
                "OFTALMO_PRESIGN_TTL_SECS must be between {MIN_PRESIGN_SECS} and {MAX_PRESIGN_SECS}, got {presign_secs}"
            ));
        }

        let store = match var("OFTALMO_STORE").as_deref().map(str::trim) {
            None | Some("s3") => StoreBackend::S3,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(eyre::eyre!(
                    "OFTALMO_STORE must be \"s3\" or \"memory\", got {other:?}"
                ));
            }
        };

        Ok(Self {
            bucket: var("OFTALMO_BUCKET").unwrap_or_else(|| "oftalmo".to_string()),
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            jwt_secret,
            jwt_issuer: var("OFTALMO_JWT_ISSUER"),
            presign_ttl: Duration::from_secs(presign_secs),
            store,
        })
    }
}
