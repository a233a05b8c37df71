use std::sync::Arc;

use crate::format::FormatKind;

/// An exported file: name, format and encoded bytes. Immutable once built;
/// clones share the same byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    filename: String,
    format: FormatKind,
    bytes: Arc<[u8]>,
}

impl Artifact {
    pub(crate) fn new(base_name: &str, format: FormatKind, bytes: Vec<u8>) -> Self {
        Self {
            filename: artifact_filename(base_name, format),
            format,
            bytes: bytes.into(),
        }
    }

    /// `<base_name>.<extension>`
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// File name an export of `base_name` to `format` is stored under.
pub fn artifact_filename(base_name: &str, format: FormatKind) -> String {
    format!("{}.{}", base_name, format.extension())
}
