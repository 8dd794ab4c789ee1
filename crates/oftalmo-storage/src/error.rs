use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no record at {key}")]
    NotFound { key: String },

    /// The stored ETag no longer matches the one the write was based on.
    #[error("{key} changed since it was read")]
    PreconditionFailed { key: String },

    #[error("record is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("object store {op} failed: {message}")]
    Backend { op: &'static str, message: String },
}

impl StorageError {
    pub(crate) fn backend(op: &'static str, message: impl ToString) -> Self {
        StorageError::Backend {
            op,
            message: message.to_string(),
        }
    }
}
