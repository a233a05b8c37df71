//! Writes finished artifacts to an output directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use brickmesh_export::Artifact;

pub struct DirectorySink {
    directory: PathBuf,
    written: HashSet<String>,
}

impl DirectorySink {
    /// Create the sink, creating the directory if it doesn't exist.
    pub fn create(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create output directory {:?}", directory))?;
        Ok(Self {
            directory,
            written: HashSet::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write one artifact under its own file name. Files left over from an
    /// earlier run are overwritten, but a name already written by this sink
    /// is an error: two inputs sharing a base name would otherwise lose one
    /// of their artifacts.
    pub fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.directory.join(artifact.filename());
        if !self.written.insert(artifact.filename().to_string()) {
            bail!(
                "Not writing {:?}: another input with the same base name already wrote it",
                path
            );
        }
        fs::write(&path, artifact.bytes()).with_context(|| format!("Failed to write {:?}", path))?;
        info!(
            "Wrote {:?} ({}, {} bytes)",
            path,
            artifact.mime_type(),
            artifact.len()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickmesh_export::{Document, ExportDispatcher, FormatKind, Pipeline};

    #[tokio::test]
    async fn writes_artifacts_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::create(dir.path().join("out")).unwrap();

        let pipeline = Pipeline::new(ExportDispatcher::with_default_encoders());
        let collection = pipeline
            .run(
                vec![Document::new("tile", "4 15 0 0 0 1 0 0 1 1 0 0 1 0\n")],
                &[FormatKind::Stl, FormatKind::Obj],
            )
            .await
            .unwrap();

        for artifact in collection.all_artifacts() {
            let path = sink.write(&artifact).unwrap();
            assert_eq!(fs::read(&path).unwrap(), artifact.bytes());
        }
        assert!(sink.directory().join("tile.stl").is_file());
        assert!(sink.directory().join("tile.obj").is_file());
    }

    #[tokio::test]
    async fn same_base_name_is_reported_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::create(dir.path()).unwrap();

        let pipeline = Pipeline::new(ExportDispatcher::with_default_encoders());
        let collection = pipeline
            .run(
                vec![
                    Document::new("a", "3 4 0 0 0 1 0 0 0 1 0\n"),
                    Document::new("a", "3 1 0 0 0 2 0 0 0 2 0\n"),
                ],
                &[FormatKind::Obj],
            )
            .await
            .unwrap();
        let artifacts = collection.all_artifacts();
        assert_eq!(artifacts.len(), 2);

        let first = sink.write(&artifacts[0]).unwrap();
        let err = sink.write(&artifacts[1]).unwrap_err();
        assert!(err.to_string().contains("same base name"));
        assert_eq!(fs::read(&first).unwrap(), artifacts[0].bytes());
    }

    #[test]
    fn stale_files_from_earlier_runs_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.obj"), b"old").unwrap();

        let mesh =
            brickmesh_core::MeshBuilder::build_document("a", "3 4 0 0 0 1 0 0 0 1 0").unwrap();
        let artifact = ExportDispatcher::with_default_encoders()
            .encode(&mesh, "a", FormatKind::Obj)
            .unwrap();

        let mut sink = DirectorySink::create(dir.path()).unwrap();
        let path = sink.write(&artifact).unwrap();
        assert_eq!(fs::read(path).unwrap(), artifact.bytes());
    }
}
