//! oftalmo-storage
//!
//! Object storage for records and imaging files. The [`store::RecordStore`]
//! trait has an S3 implementation for deployments and an in-memory one for
//! tests and local runs.

pub mod client;
pub mod error;
pub mod records;
pub mod store;
