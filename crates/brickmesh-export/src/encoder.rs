use brickmesh_core::Mesh;

use crate::error::EncodeError;

/// Serializes a finished mesh into one file format's byte layout.
///
/// Encoders only read the mesh and may run on any thread.
pub trait MeshEncoder: Send + Sync {
    fn encode(&self, mesh: &Mesh) -> Result<Vec<u8>, EncodeError>;
}
