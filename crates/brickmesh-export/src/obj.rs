//! Wavefront OBJ export
//!
//! Vertex colors use the common `v x y z r g b` extension, so the output
//! stays a single file with no material library.

use std::io::Write;

use brickmesh_core::Mesh;

use crate::encoder::MeshEncoder;
use crate::error::EncodeError;

/// Writes a mesh as OBJ text with per-vertex colors.
#[derive(Debug, Clone)]
pub struct ObjEncoder {
    object_name: String,
}

impl ObjEncoder {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
        }
    }
}

impl Default for ObjEncoder {
    fn default() -> Self {
        Self::new("ldraw")
    }
}

impl MeshEncoder for ObjEncoder {
    fn encode(&self, mesh: &Mesh) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();

        writeln!(out, "# brickmesh")?;
        writeln!(
            out,
            "# {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.triangle_count()
        )?;
        writeln!(out, "o {}", self.object_name)?;

        for (p, c) in mesh.positions().iter().zip(mesh.vertex_colors()) {
            writeln!(out, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.r, c.g, c.b)?;
        }

        // OBJ indices are 1-based.
        for face in mesh.indices().chunks_exact(3) {
            writeln!(out, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
        }

        Ok(out)
    }
}
