// Error types shared by the form loader, renderer and PDF writer

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Form definition contains field entry without name (entry {index})")]
    MissingFieldName { index: usize },
    #[error("Form definition has duplicate field name \"{0}\"")]
    DuplicateFieldName(String),
    #[error("Field \"{0}\" not found")]
    FieldNotFound(String),
    #[error("Value too long for field \"{field}\": {length} characters, at most {max}")]
    ValueTooLong {
        field: String,
        length: usize,
        max: usize,
    },
    #[error("Field \"{field}\" must be numeric, got \"{value}\"")]
    NotNumeric { field: String, value: String },
    #[error("Invalid form definition: {0}")]
    InvalidDefinition(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Failed to read form definition: {0}")]
    DefinitionError(String),
    #[error("Failed to read records: {0}")]
    RecordError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Document has no pages to save")]
    EmptyDocument,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
