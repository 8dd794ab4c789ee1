//! oftalmo-audit
//!
//! Application-level audit trail for access to patient records.

pub mod events;

pub use events::{AuditAction, AuditEvent, ResourceType};
