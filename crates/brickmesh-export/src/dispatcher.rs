use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use brickmesh_core::Mesh;

use crate::artifact::{artifact_filename, Artifact};
use crate::encoder::MeshEncoder;
use crate::error::ExportError;
use crate::format::FormatKind;
use crate::gltf_encoder::GltfEncoder;
use crate::obj::ObjEncoder;
use crate::stl::StlEncoder;

/// Routes export requests to the encoder registered for each format.
///
/// Cloning is cheap: encoders are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct ExportDispatcher {
    encoders: HashMap<FormatKind, Arc<dyn MeshEncoder>>,
}

impl ExportDispatcher {
    /// Create a dispatcher with no encoders registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with the built-in encoder for every format.
    /// `Gltf` and `Glb` share the glTF encoder with different packaging.
    pub fn with_default_encoders() -> Self {
        let mut dispatcher = Self::new();
        dispatcher
            .register(FormatKind::Gltf, GltfEncoder::text())
            .register(FormatKind::Glb, GltfEncoder::binary())
            .register(FormatKind::Obj, ObjEncoder::default())
            .register(FormatKind::Stl, StlEncoder);
        dispatcher
    }

    /// Register (or replace) the encoder for a format.
    pub fn register(
        &mut self,
        format: FormatKind,
        encoder: impl MeshEncoder + 'static,
    ) -> &mut Self {
        debug!("Registered encoder for {}", format);
        self.encoders.insert(format, Arc::new(encoder));
        self
    }

    pub fn supports(&self, format: FormatKind) -> bool {
        self.encoders.contains_key(&format)
    }

    /// Fail fast if any requested format has no encoder.
    pub fn check_formats(&self, formats: &[FormatKind]) -> Result<(), ExportError> {
        match formats.iter().find(|format| !self.supports(**format)) {
            Some(format) => Err(ExportError::UnsupportedFormat(
                format.extension().to_string(),
            )),
            None => Ok(()),
        }
    }

    fn encoder(&self, format: FormatKind) -> Result<Arc<dyn MeshEncoder>, ExportError> {
        self.encoders
            .get(&format)
            .cloned()
            .ok_or_else(|| ExportError::UnsupportedFormat(format.extension().to_string()))
    }

    /// Encode on the calling thread.
    pub fn encode(
        &self,
        mesh: &Mesh,
        base_name: &str,
        format: FormatKind,
    ) -> Result<Artifact, ExportError> {
        let encoder = self.encoder(format)?;
        finish(base_name, format, encoder.encode(mesh).map_err(|e| e.to_string()))
    }

    /// Encode on the blocking pool. Each call is independent: a failure here
    /// never affects other exports of the same or other meshes.
    pub async fn export(
        &self,
        mesh: Arc<Mesh>,
        base_name: &str,
        format: FormatKind,
    ) -> Result<Artifact, ExportError> {
        let encoder = self.encoder(format)?;

        let result = tokio::task::spawn_blocking(move || {
            encoder.encode(&mesh).map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|join_error| Err(format!("encoder task failed: {}", join_error)));

        finish(base_name, format, result)
    }
}

fn finish(
    base_name: &str,
    format: FormatKind,
    result: Result<Vec<u8>, String>,
) -> Result<Artifact, ExportError> {
    match result {
        Ok(bytes) => {
            let artifact = Artifact::new(base_name, format, bytes);
            info!("Exported '{}' ({} bytes)", artifact.filename(), artifact.len());
            Ok(artifact)
        }
        Err(reason) => {
            let filename = artifact_filename(base_name, format);
            debug!("An error happened during {} export of '{}': {}", format, filename, reason);
            Err(ExportError::EncodingFailed {
                format,
                filename,
                reason,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use brickmesh_core::MeshBuilder;

    struct FailingEncoder;

    impl MeshEncoder for FailingEncoder {
        fn encode(&self, _mesh: &Mesh) -> Result<Vec<u8>, EncodeError> {
            Err(EncodeError::Message("encoder exploded".to_string()))
        }
    }

    struct PanickingEncoder;

    impl MeshEncoder for PanickingEncoder {
        fn encode(&self, _mesh: &Mesh) -> Result<Vec<u8>, EncodeError> {
            panic!("encoder panicked");
        }
    }

    fn sample_mesh() -> Arc<Mesh> {
        Arc::new(MeshBuilder::build_document("brick", "3 4 0 0 0 1 0 0 0 1 0").unwrap())
    }

    #[test]
    fn default_encoders_cover_every_format() {
        let dispatcher = ExportDispatcher::with_default_encoders();
        for format in FormatKind::ALL {
            assert!(dispatcher.supports(format));
        }
        assert!(dispatcher.check_formats(&FormatKind::ALL).is_ok());
    }

    #[test]
    fn unregistered_format_is_unsupported() {
        let mut dispatcher = ExportDispatcher::new();
        dispatcher.register(FormatKind::Obj, ObjEncoder::default());

        let err = dispatcher
            .encode(&sample_mesh(), "brick", FormatKind::Stl)
            .unwrap_err();
        assert_eq!(err, ExportError::UnsupportedFormat("stl".to_string()));
        assert!(dispatcher
            .check_formats(&[FormatKind::Obj, FormatKind::Glb])
            .is_err());
    }

    #[test]
    fn encode_names_artifact_after_base_name() {
        let dispatcher = ExportDispatcher::with_default_encoders();
        let artifact = dispatcher
            .encode(&sample_mesh(), "brick", FormatKind::Obj)
            .unwrap();
        assert_eq!(artifact.filename(), "brick.obj");
        assert_eq!(artifact.format(), FormatKind::Obj);
        assert!(!artifact.is_empty());
    }

    #[tokio::test]
    async fn two_formats_give_independent_artifacts() {
        let dispatcher = ExportDispatcher::with_default_encoders();
        let mesh = sample_mesh();

        let (gltf, stl) = tokio::join!(
            dispatcher.export(Arc::clone(&mesh), "brick", FormatKind::Gltf),
            dispatcher.export(Arc::clone(&mesh), "brick", FormatKind::Stl),
        );
        let (gltf, stl) = (gltf.unwrap(), stl.unwrap());

        assert_eq!(gltf.filename(), "brick.gltf");
        assert_eq!(stl.filename(), "brick.stl");
        assert_ne!(gltf.bytes(), stl.bytes());
    }

    #[tokio::test]
    async fn failing_format_does_not_affect_others() {
        let mut dispatcher = ExportDispatcher::with_default_encoders();
        dispatcher.register(FormatKind::Glb, FailingEncoder);
        let mesh = sample_mesh();

        let (glb, obj) = tokio::join!(
            dispatcher.export(Arc::clone(&mesh), "brick", FormatKind::Glb),
            dispatcher.export(Arc::clone(&mesh), "brick", FormatKind::Obj),
        );

        match glb.unwrap_err() {
            ExportError::EncodingFailed {
                format,
                filename,
                reason,
            } => {
                assert_eq!(format, FormatKind::Glb);
                assert_eq!(filename, "brick.glb");
                assert_eq!(reason, "encoder exploded");
            }
            other => panic!("expected EncodingFailed, got {:?}", other),
        }

        let obj = obj.unwrap();
        let expected = ObjEncoder::default().encode(&mesh).unwrap();
        assert_eq!(obj.bytes(), expected.as_slice());
    }

    #[tokio::test]
    async fn panicking_encoder_becomes_encoding_failure() {
        let mut dispatcher = ExportDispatcher::new();
        dispatcher.register(FormatKind::Stl, PanickingEncoder);

        let err = dispatcher
            .export(sample_mesh(), "brick", FormatKind::Stl)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::EncodingFailed { .. }));
    }
}
