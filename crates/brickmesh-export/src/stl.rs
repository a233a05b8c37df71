//! Binary STL export via `stl_io`.

use brickmesh_core::{Mesh, Vec3};
use stl_io::{Normal, Triangle, Vertex};

use crate::encoder::MeshEncoder;
use crate::error::EncodeError;

/// Writes one STL facet per mesh triangle. STL has no color channel, so
/// vertex colors are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlEncoder;

impl MeshEncoder for StlEncoder {
    fn encode(&self, mesh: &Mesh) -> Result<Vec<u8>, EncodeError> {
        if u32::try_from(mesh.triangle_count()).is_err() {
            return Err(EncodeError::TooLarge("STL"));
        }

        let facets: Vec<Triangle> = mesh
            .triangles()
            .map(|[a, b, c]| Triangle {
                normal: Normal::new(face_normal(a, b, c).to_array()),
                vertices: [
                    Vertex::new(a.to_array()),
                    Vertex::new(b.to_array()),
                    Vertex::new(c.to_array()),
                ],
            })
            .collect();

        let mut bytes = Vec::with_capacity(84 + facets.len() * 50);
        stl_io::write_stl(&mut bytes, facets.iter())?;
        Ok(bytes)
    }
}

/// Unit normal from counter-clockwise winding; zero for degenerate faces.
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
