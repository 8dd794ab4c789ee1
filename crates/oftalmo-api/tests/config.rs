use std::collections::HashMap;
use std::time::Duration;

use oftalmo_api::config::{ApiConfig, StoreBackend};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_apply() {
    let config = ApiConfig::from_lookup(lookup(&[("OFTALMO_JWT_SECRET", "s")])).unwrap();
    assert_eq!(config.bucket, "oftalmo");
    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.presign_ttl, Duration::from_secs(900));
    assert_eq!(config.store, StoreBackend::S3);
    assert!(config.jwt_issuer.is_none());
}

#[test]
fn secret_is_required() {
    assert!(ApiConfig::from_lookup(lookup(&[])).is_err());
    assert!(ApiConfig::from_lookup(lookup(&[("OFTALMO_JWT_SECRET", "  ")])).is_err());
}

#[test]
fn presign_ttl_is_bounded() {
    let with_ttl = |ttl: &str| {
        ApiConfig::from_lookup(lookup(&[
            ("OFTALMO_JWT_SECRET", "s"),
            ("OFTALMO_PRESIGN_TTL_SECS", ttl),
        ]))
    };
    assert_eq!(with_ttl("3600").unwrap().presign_ttl, Duration::from_secs(3600));
    assert!(with_ttl("59").is_err());
    assert!(with_ttl("604801").is_err());
    assert!(with_ttl("soon").is_err());
}

#[test]
fn store_backend_is_parsed() {
    let with_store = |store: &str| {
        ApiConfig::from_lookup(lookup(&[("OFTALMO_JWT_SECRET", "s"), ("OFTALMO_STORE", store)]))
    };
    assert_eq!(with_store("memory").unwrap().store, StoreBackend::Memory);
    assert_eq!(with_store("s3").unwrap().store, StoreBackend::S3);
    assert!(with_store("postgres").is_err());
}
