use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The template source itself is malformed.
    #[error("invalid summary template: {0}")]
    TemplateParse(String),

    #[error("could not render summary: {0}")]
    TemplateRender(String),

    #[error("could not build DOCX: {0}")]
    Docx(String),

    #[error("could not serialize summary context: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        // tera nests the useful detail in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        ExportError::TemplateRender(message)
    }
}
