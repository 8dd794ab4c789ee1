use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use super::{BoxFuture, GetObjectOutput, RecordStore};
use crate::error::StorageError;

struct StoredObject {
    body: Vec<u8>,
    etag: String,
    content_type: Option<String>,
}

/// [`RecordStore`] held in process memory.
///
/// ETags are a per-store counter, so every write yields a fresh one.
/// Presigned URLs use a `memory://` scheme and are not fetchable.
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    next_etag: AtomicU64,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
            next_etag: AtomicU64::new(1),
        }
    }

    fn etag(&self) -> String {
        format!("\"{}\"", self.next_etag.fetch_add(1, Ordering::Relaxed))
    }

    fn presigned(&self, method: &str, key: &str, expires_in: Duration) -> String {
        format!(
            "memory://{}/{key}?method={method}&expires={}",
            self.bucket,
            expires_in.as_secs()
        )
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl RecordStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>> {
        Box::pin(async move {
            let objects = self.objects.lock().await;
            let obj = objects.get(key).ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
            Ok(GetObjectOutput {
                body: obj.body.clone(),
                etag: Some(obj.etag.clone()),
                content_type: obj.content_type.clone(),
            })
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let etag = self.etag();
            self.objects.lock().await.insert(
                key.to_string(),
                StoredObject {
                    body,
                    etag: etag.clone(),
                    content_type: content_type.map(str::to_string),
                },
            );
            Ok(etag)
        })
    }

    fn put_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let mut objects = self.objects.lock().await;
            let current = objects.get(key).map(|o| o.etag.as_str());
            if current != Some(expected_etag) {
                return Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                });
            }
            let etag = self.etag();
            objects.insert(
                key.to_string(),
                StoredObject {
                    body,
                    etag: etag.clone(),
                    content_type: content_type.map(str::to_string),
                },
            );
            Ok(etag)
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.objects.lock().await.remove(key);
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let objects = self.objects.lock().await;
            Ok(objects
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect())
        })
    }

    fn presign_get<'a>(
        &'a self,
        key: &'a str,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move { Ok(self.presigned("GET", key, expires_in)) })
    }

    fn presign_put<'a>(
        &'a self,
        key: &'a str,
        _content_type: Option<&'a str>,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move { Ok(self.presigned("PUT", key, expires_in)) })
    }
}
