/// Why a single `3`/`4` line could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedLineError {
    #[error("expected {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("'{token}' is not a valid coordinate")]
    InvalidNumber { token: String },
}

/// Errors that abort the conversion of one document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid LDraw data in '{filename}' at line {line}: {source}")]
    InvalidInput {
        filename: String,
        line: usize,
        #[source]
        source: MalformedLineError,
    },

    #[error("'{filename}' has more vertices than a 32-bit index can address")]
    TooManyVertices { filename: String },

    #[error("parsing '{filename}' did not complete: {reason}")]
    Interrupted { filename: String, reason: String },
}

impl ConversionError {
    /// Name of the document that failed.
    pub fn filename(&self) -> &str {
        match self {
            ConversionError::InvalidInput { filename, .. } => filename,
            ConversionError::TooManyVertices { filename } => filename,
            ConversionError::Interrupted { filename, .. } => filename,
        }
    }
}
