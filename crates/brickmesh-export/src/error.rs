use crate::format::FormatKind;

/// Errors an encoder can report while serializing a mesh.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("glTF packaging failed: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error while encoding: {0}")]
    Io(#[from] std::io::Error),

    #[error("mesh is too large for the {0} format")]
    TooLarge(&'static str),

    #[error("{0}")]
    Message(String),
}

/// Errors that can occur while exporting one mesh to one format.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("export to {format} for '{filename}' failed: {reason}")]
    EncodingFailed {
        format: FormatKind,
        filename: String,
        reason: String,
    },

    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
}
