//! Brickmesh Export - Mesh serialization and conversion pipeline
//!
//! Provides glTF, GLB, OBJ and STL encoders behind a common
//! [`MeshEncoder`] trait, an [`ExportDispatcher`] that routes a mesh to the
//! encoder for a requested format, and a [`Pipeline`] that converts many
//! documents concurrently with per-document failure isolation.

mod artifact;
mod collection;
mod dispatcher;
mod encoder;
mod error;
mod format;
mod gltf_encoder;
mod obj;
mod pipeline;
mod stl;

pub use artifact::{artifact_filename, Artifact};
pub use collection::ArtifactCollection;
pub use dispatcher::ExportDispatcher;
pub use encoder::MeshEncoder;
pub use error::{EncodeError, ExportError};
pub use format::FormatKind;
pub use gltf_encoder::{GltfEncoder, Packaging};
pub use obj::ObjEncoder;
pub use pipeline::{ConversionOutcome, Document, Pipeline, PASTED_DOCUMENT_NAME};
pub use stl::StlEncoder;
