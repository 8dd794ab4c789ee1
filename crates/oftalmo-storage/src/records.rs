//! JSON record helpers over a [`RecordStore`].

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::store::RecordStore;

const JSON: &str = "application/json";

/// Load a JSON record. Returns the deserialized value and its ETag.
pub async fn load<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<(T, String), StorageError> {
    let output = store.get(key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    Ok((value, output.etag.unwrap_or_default()))
}

/// Load a record, mapping a missing key to `None`.
pub async fn load_optional<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<Option<(T, String)>, StorageError> {
    match load(store, key).await {
        Ok(found) => Ok(Some(found)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON record unconditionally. Returns the new ETag.
pub async fn save<T: Serialize>(
    store: &dyn RecordStore,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put(key, body, Some(JSON)).await
}

/// Save a JSON record only if it still carries `expected_etag`.
pub async fn save_if_match<T: Serialize>(
    store: &dyn RecordStore,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    store.put_if_match(key, body, Some(JSON), expected_etag).await
}

/// Load every `.json` record under a prefix.
///
/// A record that fails to parse is logged and skipped so one corrupt object
/// does not take down a whole listing.
pub async fn load_all<T: DeserializeOwned>(
    store: &dyn RecordStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let keys = store.list(prefix).await?;

    let mut records = Vec::with_capacity(keys.len());
    for key in keys.iter().filter(|k| k.ends_with(".json")) {
        let output = match store.get(key).await {
            Ok(output) => output,
            // Deleted between list and get.
            Err(StorageError::NotFound { .. }) => continue,
            Err(e) => return Err(e),
        };
        match serde_json::from_slice(&output.body) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable record"),
        }
    }

    Ok(records)
}
