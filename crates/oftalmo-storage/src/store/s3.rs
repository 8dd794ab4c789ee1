use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use super::{BoxFuture, GetObjectOutput, RecordStore};
use crate::error::StorageError;

/// [`RecordStore`] backed by a single S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn presigning_config(expires_in: Duration) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| StorageError::backend("presign", e))
    }
}

impl RecordStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    let err = e.into_service_error();
                    if err.is_no_such_key() {
                        StorageError::NotFound {
                            key: key.to_string(),
                        }
                    } else {
                        StorageError::backend("get", err)
                    }
                })?;

            let etag = resp.e_tag().map(|s| s.to_string());
            let content_type = resp.content_type().map(|s| s.to_string());
            let body = resp
                .body
                .collect()
                .await
                .map_err(|e| StorageError::backend("get", e))?
                .into_bytes()
                .to_vec();

            Ok(GetObjectOutput {
                body,
                etag,
                content_type,
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
            let mut req = self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(body));

            if let Some(ct) = content_type {
                req = req.content_type(ct);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| StorageError::backend("put", e.into_service_error()))?;

            Ok(resp.e_tag().unwrap_or_default().to_string())
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
            let mut req = self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(body))
                .if_match(expected_etag);

            if let Some(ct) = content_type {
                req = req.content_type(ct);
            }

            let resp = req.send().await.map_err(|e| {
                // S3 answers 412 when If-Match does not hold
                let status = e.raw_response().map(|r| r.status().as_u16());
                if status == Some(412) {
                    StorageError::PreconditionFailed {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::backend("put", e.into_service_error())
                }
            })?;

            Ok(resp.e_tag().unwrap_or_default().to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| StorageError::backend("delete", e.into_service_error()))?;
            Ok(())
        })
    }

    fn list<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let mut keys = Vec::new();
            let mut continuation_token: Option<String> = None;

            loop {
                let mut req = self
                    .client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix);

                if let Some(token) = &continuation_token {
                    req = req.continuation_token(token);
                }

                let resp = req
                    .send()
                    .await
                    .map_err(|e| StorageError::backend("list", e.into_service_error()))?;

                keys.extend(resp.contents().iter().filter_map(|o| o.key().map(str::to_string)));

                if resp.is_truncated() == Some(true) {
                    continuation_token = resp.next_continuation_token().map(|s| s.to_string());
                } else {
                    break;
                }
            }

            Ok(keys)
        })
    }

    fn presign_get<'a>(
        &'a self,
        key: &'a str,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let presigned = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .presigned(Self::presigning_config(expires_in)?)
                .await
                .map_err(|e| StorageError::backend("presign", e))?;

            Ok(presigned.uri().to_string())
        })
    }

    fn presign_put<'a>(
        &'a self,
        key: &'a str,
        content_type: Option<&'a str>,
        expires_in: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let mut req = self.client.put_object().bucket(&self.bucket).key(key);

            if let Some(ct) = content_type {
                req = req.content_type(ct);
            }

            let presigned = req
                .presigned(Self::presigning_config(expires_in)?)
                .await
                .map_err(|e| StorageError::backend("presign", e))?;

            Ok(presigned.uri().to_string())
        })
    }
}
