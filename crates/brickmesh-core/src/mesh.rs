//! Indexed mesh construction
//!
//! [`MeshBuilder`] folds primitive records into a single [`Mesh`]. The only
//! state carried between lines is the active color code: a new color group
//! starts whenever a primitive's code differs from the previous primitive's
//! (including the first primitive of a document).

use glam::Vec3;
use tracing::debug;

use crate::color::{self, ColorCode, Rgb};
use crate::error::ConversionError;
use crate::record::{parse_line, PrimitiveRecord};

/// A contiguous run of vertices that came from primitives sharing one color
/// code.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub code: ColorCode,
    pub rgb: Rgb,
    pub first_vertex: usize,
    pub vertex_count: usize,
}

/// Indexed triangle mesh produced from one document.
///
/// Vertices are never welded: every primitive appends its own corners, so
/// `positions` is in parse order and `vertex_colors` has exactly one entry
/// per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    vertex_colors: Vec<Rgb>,
    indices: Vec<u32>,
    color_groups: Vec<ColorGroup>,
}

impl Mesh {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn vertex_colors(&self) -> &[Rgb] {
        &self.vertex_colors
    }

    /// Triangle corner indices, three per face.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn color_groups(&self) -> &[ColorGroup] {
        &self.color_groups
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate the corner positions of every face.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|face| {
            [
                self.positions[face[0] as usize],
                self.positions[face[1] as usize],
                self.positions[face[2] as usize],
            ]
        })
    }

    /// Axis-aligned bounds as `(min, max)`, `None` when there are no vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}

/// Accumulates primitive records into a [`Mesh`].
#[derive(Debug)]
pub struct MeshBuilder {
    filename: String,
    current_color: Option<ColorCode>,
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            current_color: None,
            mesh: Mesh::default(),
        }
    }

    /// Build a mesh from a sequence of lines. Fails on the first malformed
    /// geometry line; no partial mesh is returned.
    pub fn build<'a, I>(filename: &str, lines: I) -> Result<Mesh, ConversionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let builder = lines.into_iter().enumerate().try_fold(
            MeshBuilder::new(filename),
            |mut builder, (index, line)| {
                let record =
                    parse_line(line).map_err(|source| ConversionError::InvalidInput {
                        filename: builder.filename.clone(),
                        line: index + 1,
                        source,
                    })?;
                builder.push_record(record)?;
                Ok::<_, ConversionError>(builder)
            },
        )?;

        let mesh = builder.finish();
        debug!(
            "Built mesh '{}': {} vertices, {} triangles, {} color groups",
            filename,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.color_groups().len()
        );
        Ok(mesh)
    }

    /// Build a mesh from the full text of a document.
    pub fn build_document(filename: &str, text: &str) -> Result<Mesh, ConversionError> {
        Self::build(filename, text.lines())
    }

    /// The color code of the most recent primitive, if any.
    pub fn current_color(&self) -> Option<&ColorCode> {
        self.current_color.as_ref()
    }

    /// Apply one record. Ignored records leave the builder untouched.
    pub fn push_record(&mut self, record: PrimitiveRecord) -> Result<(), ConversionError> {
        let (color, vertices) = match &record {
            PrimitiveRecord::Ignored => return Ok(()),
            PrimitiveRecord::Triangle { color, vertices } => (color, vertices.as_slice()),
            PrimitiveRecord::Quad { color, vertices } => (color, vertices.as_slice()),
        };

        let base = self.mesh.positions.len();
        let last = base + vertices.len() - 1;
        let i = u32::try_from(base)
            .ok()
            .filter(|_| u32::try_from(last).is_ok())
            .ok_or_else(|| ConversionError::TooManyVertices {
                filename: self.filename.clone(),
            })?;

        if self.current_color.as_ref() != Some(color) {
            self.mesh.color_groups.push(ColorGroup {
                code: color.clone(),
                rgb: color::resolve(color),
                first_vertex: base,
                vertex_count: 0,
            });
            self.current_color = Some(color.clone());
        }

        // A group was opened above if none existed yet.
        if let Some(group) = self.mesh.color_groups.last_mut() {
            group.vertex_count += vertices.len();
            self.mesh
                .vertex_colors
                .extend(std::iter::repeat(group.rgb).take(vertices.len()));
        }
        self.mesh.positions.extend_from_slice(vertices);

        self.mesh.indices.extend_from_slice(&[i, i + 1, i + 2]);
        if vertices.len() == 4 {
            self.mesh.indices.extend_from_slice(&[i, i + 2, i + 3]);
        }

        Ok(())
    }

    /// Freeze the accumulated mesh.
    pub fn finish(self) -> Mesh {
        self.mesh
    }
}
