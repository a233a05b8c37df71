use std::collections::HashMap;

use parking_lot::Mutex;

use brickmesh_core::ConversionError;

use crate::artifact::Artifact;
use crate::error::ExportError;
use crate::format::FormatKind;
use crate::pipeline::ConversionOutcome;

/// Append-only store of conversion results, grouped by format.
///
/// Safe to share between tasks; entries are never removed.
#[derive(Debug, Default)]
pub struct ArtifactCollection {
    inner: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    artifacts: HashMap<FormatKind, Vec<Artifact>>,
    parse_failures: Vec<ConversionError>,
    export_failures: Vec<ExportError>,
}

impl ArtifactCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: ConversionOutcome) {
        let mut entries = self.inner.lock();
        match outcome {
            ConversionOutcome::Exported(artifact) => entries
                .artifacts
                .entry(artifact.format())
                .or_default()
                .push(artifact),
            ConversionOutcome::ParseFailed(err) => entries.parse_failures.push(err),
            ConversionOutcome::ExportFailed(err) => entries.export_failures.push(err),
        }
    }

    /// Artifacts of one format in arrival order.
    pub fn artifacts(&self, format: FormatKind) -> Vec<Artifact> {
        self.inner
            .lock()
            .artifacts
            .get(&format)
            .cloned()
            .unwrap_or_default()
    }

    /// Every artifact, grouped in [`FormatKind::ALL`] order.
    pub fn all_artifacts(&self) -> Vec<Artifact> {
        let entries = self.inner.lock();
        FormatKind::ALL
            .iter()
            .filter_map(|format| entries.artifacts.get(format))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn artifact_count(&self) -> usize {
        self.inner.lock().artifacts.values().map(Vec::len).sum()
    }

    pub fn parse_failures(&self) -> Vec<ConversionError> {
        self.inner.lock().parse_failures.clone()
    }

    pub fn export_failures(&self) -> Vec<ExportError> {
        self.inner.lock().export_failures.clone()
    }

    pub fn failure_count(&self) -> usize {
        let entries = self.inner.lock();
        entries.parse_failures.len() + entries.export_failures.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn groups_by_format() {
        let collection = ArtifactCollection::new();
        collection.push(ConversionOutcome::Exported(Artifact::new(
            "a",
            FormatKind::Stl,
            vec![1],
        )));
        collection.push(ConversionOutcome::Exported(Artifact::new(
            "a",
            FormatKind::Gltf,
            vec![2],
        )));
        collection.push(ConversionOutcome::Exported(Artifact::new(
            "b",
            FormatKind::Stl,
            vec![3],
        )));

        assert_eq!(collection.artifact_count(), 3);
        let names: Vec<_> = collection
            .artifacts(FormatKind::Stl)
            .iter()
            .map(|a| a.filename().to_string())
            .collect();
        assert_eq!(names, ["a.stl", "b.stl"]);
        assert_eq!(collection.all_artifacts()[0].filename(), "a.gltf");
        assert!(!collection.has_failures());
    }

    #[test]
    fn records_failures() {
        let collection = ArtifactCollection::new();
        collection.push(ConversionOutcome::ExportFailed(ExportError::EncodingFailed {
            format: FormatKind::Obj,
            filename: "a.obj".to_string(),
            reason: "broken".to_string(),
        }));
        assert_eq!(collection.failure_count(), 1);
        assert_eq!(collection.export_failures().len(), 1);
        assert!(collection.parse_failures().is_empty());
    }

    #[test]
    fn concurrent_appends() {
        let collection = Arc::new(ArtifactCollection::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let collection = Arc::clone(&collection);
                std::thread::spawn(move || {
                    collection.push(ConversionOutcome::Exported(Artifact::new(
                        &format!("doc{}", i),
                        FormatKind::Obj,
                        vec![i as u8],
                    )));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(collection.artifacts(FormatKind::Obj).len(), 8);
    }
}
