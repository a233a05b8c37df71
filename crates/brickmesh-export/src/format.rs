use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Output file format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// glTF 2.0 JSON document with an embedded buffer.
    Gltf,
    /// Binary glTF 2.0 container.
    Glb,
    /// Wavefront OBJ text.
    Obj,
    /// Binary STL.
    Stl,
}

impl FormatKind {
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Gltf,
        FormatKind::Glb,
        FormatKind::Obj,
        FormatKind::Stl,
    ];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::Gltf => "gltf",
            FormatKind::Glb => "glb",
            FormatKind::Obj => "obj",
            FormatKind::Stl => "stl",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FormatKind::Gltf => "model/gltf+json",
            FormatKind::Glb => "model/gltf-binary",
            FormatKind::Obj => "model/obj",
            FormatKind::Stl => "model/stl",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

impl FromStr for FormatKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.');
        FormatKind::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(name))
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extension_names() {
        assert_eq!("gltf".parse::<FormatKind>().unwrap(), FormatKind::Gltf);
        assert_eq!("GLB".parse::<FormatKind>().unwrap(), FormatKind::Glb);
        assert_eq!(".obj".parse::<FormatKind>().unwrap(), FormatKind::Obj);
        assert_eq!(" stl ".parse::<FormatKind>().unwrap(), FormatKind::Stl);
    }

    #[test]
    fn unknown_name_is_unsupported() {
        assert_eq!(
            "fbx".parse::<FormatKind>().unwrap_err(),
            ExportError::UnsupportedFormat("fbx".to_string())
        );
    }

    #[test]
    fn mime_types() {
        assert_eq!(FormatKind::Gltf.mime_type(), "model/gltf+json");
        assert_eq!(FormatKind::Glb.mime_type(), "model/gltf-binary");
        assert_eq!(FormatKind::Obj.mime_type(), "model/obj");
        assert_eq!(FormatKind::Stl.mime_type(), "model/stl");
    }

    #[test]
    fn display_is_uppercase_extension() {
        assert_eq!(FormatKind::Glb.to_string(), "GLB");
    }
}
