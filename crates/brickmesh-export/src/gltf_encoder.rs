//! glTF 2.0 export
//!
//! Both the `.gltf` and `.glb` outputs come from the same document: one
//! buffer holding positions, vertex colors and indices, one mesh with a
//! single triangle primitive, one node and one scene. They differ only in
//! how the buffer and the JSON are packaged.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Range;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use gltf::json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use tracing::debug;

use brickmesh_core::Mesh;

use crate::encoder::MeshEncoder;
use crate::error::EncodeError;

const GENERATOR: &str = "brickmesh";
const MESH_NAME: &str = "ldraw";

/// How the glTF document is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packaging {
    /// Pretty-printed JSON with the buffer embedded as a base64 data URI.
    Text,
    /// GLB container with a JSON chunk and a BIN chunk.
    Binary,
}

/// glTF encoder shared by the `Gltf` and `Glb` formats.
#[derive(Debug, Clone, Copy)]
pub struct GltfEncoder {
    packaging: Packaging,
}

impl GltfEncoder {
    pub fn new(packaging: Packaging) -> Self {
        Self { packaging }
    }

    pub fn text() -> Self {
        Self::new(Packaging::Text)
    }

    pub fn binary() -> Self {
        Self::new(Packaging::Binary)
    }

    pub fn packaging(&self) -> Packaging {
        self.packaging
    }
}

impl MeshEncoder for GltfEncoder {
    fn encode(&self, mesh: &Mesh) -> Result<Vec<u8>, EncodeError> {
        let buffer = MeshBuffer::new(mesh);

        match self.packaging {
            Packaging::Text => {
                let uri = format!(
                    "data:application/octet-stream;base64,{}",
                    STANDARD.encode(&buffer.bytes)
                );
                let root = document(mesh, &buffer, Some(uri))?;
                Ok(serde_json::to_string_pretty(&root)?.into_bytes())
            }
            Packaging::Binary => {
                let root = document(mesh, &buffer, None)?;
                let json = serde_json::to_vec(&root)?;
                pack_glb(json, buffer.bytes)
            }
        }
    }
}

/// Vertex and index data laid out back to back in one binary buffer.
struct MeshBuffer {
    bytes: Vec<u8>,
    positions: Range<usize>,
    colors: Range<usize>,
    indices: Range<usize>,
}

impl MeshBuffer {
    // glTF buffers are little-endian, as are all targets we build for.
    fn new(mesh: &Mesh) -> Self {
        let positions: Vec<[f32; 3]> = mesh.positions().iter().map(|p| p.to_array()).collect();
        let colors: Vec<[f32; 3]> = mesh.vertex_colors().iter().map(|c| c.to_array()).collect();

        let mut bytes = Vec::new();
        let positions = append(&mut bytes, bytemuck::cast_slice(&positions));
        let colors = append(&mut bytes, bytemuck::cast_slice(&colors));
        let indices = append(&mut bytes, bytemuck::cast_slice(mesh.indices()));

        Self {
            bytes,
            positions,
            colors,
            indices,
        }
    }
}

fn append(buffer: &mut Vec<u8>, data: &[u8]) -> Range<usize> {
    let start = buffer.len();
    buffer.extend_from_slice(data);
    start..buffer.len()
}

fn document(
    mesh: &Mesh,
    buffer: &MeshBuffer,
    uri: Option<String>,
) -> Result<json::Root, EncodeError> {
    let mut root = json::Root::default();
    root.asset.generator = Some(GENERATOR.to_string());

    let mut nodes = Vec::new();
    if let Some((min, max)) = mesh.bounds().filter(|_| !mesh.is_empty()) {
        let buffer_index = root.push(json::Buffer {
            byte_length: USize64::from(buffer.bytes.len()),
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            uri,
        });

        let vertex_count = USize64::from(mesh.vertex_count());
        let positions = push_accessor(
            &mut root,
            buffer_index,
            &buffer.positions,
            json::buffer::Target::ArrayBuffer,
            AccessorLayout {
                count: vertex_count,
                component: json::accessor::ComponentType::F32,
                kind: json::accessor::Type::Vec3,
                bounds: Some((min.to_array(), max.to_array())),
            },
        );
        let colors = push_accessor(
            &mut root,
            buffer_index,
            &buffer.colors,
            json::buffer::Target::ArrayBuffer,
            AccessorLayout {
                count: vertex_count,
                component: json::accessor::ComponentType::F32,
                kind: json::accessor::Type::Vec3,
                bounds: None,
            },
        );
        let indices = push_accessor(
            &mut root,
            buffer_index,
            &buffer.indices,
            json::buffer::Target::ElementArrayBuffer,
            AccessorLayout {
                count: USize64::from(mesh.indices().len()),
                component: json::accessor::ComponentType::U32,
                kind: json::accessor::Type::Scalar,
                bounds: None,
            },
        );

        let material = root.push(json::Material {
            double_sided: true,
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                metallic_factor: json::material::StrengthFactor(0.0),
                ..Default::default()
            },
            ..Default::default()
        });

        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(json::mesh::Semantic::Positions), positions);
        attributes.insert(Valid(json::mesh::Semantic::Colors(0)), colors);

        let primitive = json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(indices),
            material: Some(material),
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        };

        let mesh_index = root.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(MESH_NAME.to_string()),
            primitives: vec![primitive],
            weights: None,
        });

        nodes.push(root.push(json::Node {
            mesh: Some(mesh_index),
            ..Default::default()
        }));
    }

    let scene = root.push(json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes,
    });
    root.scene = Some(scene);

    debug!(
        "glTF document: {} accessors, {} buffer bytes",
        root.accessors.len(),
        buffer.bytes.len()
    );

    Ok(root)
}

struct AccessorLayout {
    count: USize64,
    component: json::accessor::ComponentType,
    kind: json::accessor::Type,
    bounds: Option<([f32; 3], [f32; 3])>,
}

/// Push a buffer view covering `range` and a tightly packed accessor over it.
fn push_accessor(
    root: &mut json::Root,
    buffer: json::Index<json::Buffer>,
    range: &Range<usize>,
    target: json::buffer::Target,
    layout: AccessorLayout,
) -> json::Index<json::Accessor> {
    let view = root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(range.len()),
        byte_offset: Some(USize64::from(range.start)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(target)),
    });

    let (min, max) = match layout.bounds {
        Some((min, max)) => (
            Some(json::Value::from(min.to_vec())),
            Some(json::Value::from(max.to_vec())),
        ),
        None => (None, None),
    };

    root.push(json::Accessor {
        buffer_view: Some(view),
        byte_offset: Some(USize64(0)),
        count: layout.count,
        component_type: Valid(json::accessor::GenericComponentType(layout.component)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(layout.kind),
        min,
        max,
        name: None,
        normalized: false,
        sparse: None,
    })
}

/// Wrap the JSON and binary chunks in a GLB v2 container. The writer pads the
/// JSON chunk with spaces and the BIN chunk with zeros.
fn pack_glb(json: Vec<u8>, bin: Vec<u8>) -> Result<Vec<u8>, EncodeError> {
    const HEADER_LEN: usize = 12;
    const CHUNK_HEADER_LEN: usize = 8;

    let mut length = HEADER_LEN + CHUNK_HEADER_LEN + align_to_four(json.len());
    if !bin.is_empty() {
        length += CHUNK_HEADER_LEN + align_to_four(bin.len());
    }

    let glb = gltf::binary::Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: u32::try_from(length).map_err(|_| EncodeError::TooLarge("GLB"))?,
        },
        json: Cow::Owned(json),
        bin: (!bin.is_empty()).then_some(Cow::Owned(bin)),
    };

    let mut bytes = Vec::with_capacity(length);
    glb.to_writer(&mut bytes)?;
    Ok(bytes)
}

fn align_to_four(len: usize) -> usize {
    (len + 3) & !3
}
