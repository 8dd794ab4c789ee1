use serde::{Deserialize, Serialize};

/// Fonts and point sizes for the evaluation summary DOCX.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    pub body_font: String,
    pub heading_font: String,
    /// Points.
    pub body_size: usize,
    /// Patient header ("# ...").
    pub heading1_size: usize,
    /// Section titles such as Anamnesis and Examination.
    pub heading2_size: usize,
    /// Per-eye subsections.
    pub heading3_size: usize,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            heading_font: "Arial".to_string(),
            body_size: 11,
            heading1_size: 16,
            heading2_size: 13,
            heading3_size: 12,
        }
    }
}
