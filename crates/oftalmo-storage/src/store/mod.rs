mod memory;
mod s3;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use memory::MemoryStore;
pub use s3::S3Store;

use crate::error::StorageError;

/// Boxed future returned by [`RecordStore`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a GET operation, including the body and ETag.
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// Key/value object storage holding JSON records and uploaded files.
///
/// Methods return boxed futures so the store can be shared as
/// `Arc<dyn RecordStore>`.
pub trait RecordStore: Send + Sync {
    /// Bucket (or namespace) the store writes to, for logging.
    fn bucket(&self) -> &str;

    /// Fetch an object. Missing keys yield [`StorageError::NotFound`].
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>>;

    /// Write an object unconditionally. Returns the new ETag.
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Write an object only if its current ETag is `expected_etag`.
    /// A mismatch yields [`StorageError::PreconditionFailed`].
    fn put_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Delete an object. Deleting a missing key is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;

    /// List keys under a prefix, in lexicographic order.
    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>>;

    /// A time-limited URL the client can GET the object from.
    fn presign_get<'a>(
        &'a self,
        key: &'a str,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// A time-limited URL the client can PUT the object to.
    fn presign_put<'a>(
        &'a self,
        key: &'a str,
        content_type: Option<&'a str>,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Delete every object under a prefix. Returns the number deleted.
    fn delete_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<usize, StorageError>> {
        Box::pin(async move {
            let keys = self.list(prefix).await?;
            for key in &keys {
                self.delete(key).await?;
            }
            Ok(keys.len())
        })
    }
}
