//! Brickmesh Core - LDraw text to indexed triangle mesh
//!
//! This crate provides the parsing and geometry side of brickmesh:
//! - Color code resolution against the built-in palette
//! - Line record parsing for triangle (`3`) and quad (`4`) lines
//! - Mesh construction with color carry-over and quad triangulation
//! - Error types for malformed input

pub mod color;
pub mod error;
pub mod mesh;
pub mod record;

pub use color::{resolve, ColorCode, Rgb};
pub use error::{ConversionError, MalformedLineError};
pub use glam::Vec3;
pub use mesh::{ColorGroup, Mesh, MeshBuilder};
pub use record::{parse_document, parse_line, PrimitiveRecord};
