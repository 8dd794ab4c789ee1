//! oftalmo-core
//!
//! Pure domain types, input validation, object key conventions and the small
//! clinical reductions (best refraction, eye-log upsert) shared by the rest of
//! the workspace. No AWS SDK dependency.

pub mod breadcrumbs;
pub mod cpf;
pub mod error;
pub mod eye_logs;
pub mod keys;
pub mod models;
pub mod refraction;
pub mod session;
pub mod validation;
