//! oftalmo-export
//!
//! Evaluation summary export: a tera template renders the summary text, which
//! is returned as-is or converted to DOCX.

pub mod docx;
pub mod error;
pub mod render;
pub mod styles;
pub mod summary;
