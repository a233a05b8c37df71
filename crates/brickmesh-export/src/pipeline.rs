//! Concurrent conversion of many documents.
//!
//! Every document is its own failure domain: it is parsed in its own task,
//! and each requested format is exported in a further task of its own.
//! Outcomes arrive on a channel in completion order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use brickmesh_core::{ConversionError, MeshBuilder};

use crate::artifact::Artifact;
use crate::collection::ArtifactCollection;
use crate::dispatcher::ExportDispatcher;
use crate::error::ExportError;
use crate::format::FormatKind;

/// Base name used for text that did not come from a file.
pub const PASTED_DOCUMENT_NAME: &str = "single_file";

/// One input document, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Base name for the produced artifacts.
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// A document entered directly rather than read from a file.
    pub fn pasted(text: impl Into<String>) -> Self {
        Self::new(PASTED_DOCUMENT_NAME, text)
    }
}

/// Result of one unit of work in the pipeline.
#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    Exported(Artifact),
    ParseFailed(ConversionError),
    ExportFailed(ExportError),
}

/// Runs parse and export for a batch of documents on the tokio runtime.
#[derive(Clone)]
pub struct Pipeline {
    dispatcher: Arc<ExportDispatcher>,
}

impl Pipeline {
    pub fn new(dispatcher: ExportDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &ExportDispatcher {
        &self.dispatcher
    }

    /// Start converting `documents` into every format in `formats`.
    ///
    /// Parsing and encoding both run on the blocking pool, so a large
    /// document never holds up the async workers.
    ///
    /// Unsupported formats are rejected before any task is spawned. The
    /// returned receiver yields one outcome per failed document, or one per
    /// `(document, format)` pair for documents that parsed, and closes once
    /// all work is done. Must be called from within a tokio runtime.
    pub fn spawn(
        &self,
        documents: Vec<Document>,
        formats: &[FormatKind],
    ) -> Result<mpsc::UnboundedReceiver<ConversionOutcome>, ExportError> {
        self.dispatcher.check_formats(formats)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let formats: Arc<[FormatKind]> = formats.into();

        for document in documents {
            let tx = tx.clone();
            let dispatcher = Arc::clone(&self.dispatcher);
            let formats = Arc::clone(&formats);

            tokio::spawn(async move {
                let Document { name, text } = document;
                let parse_name = name.clone();
                let parsed = tokio::task::spawn_blocking(move || {
                    MeshBuilder::build_document(&parse_name, &text)
                })
                .await
                .unwrap_or_else(|join_error| {
                    Err(ConversionError::Interrupted {
                        filename: name.clone(),
                        reason: join_error.to_string(),
                    })
                });

                let mesh = match parsed {
                    Ok(mesh) => Arc::new(mesh),
                    Err(err) => {
                        debug!("{}", err);
                        let _ = tx.send(ConversionOutcome::ParseFailed(err));
                        return;
                    }
                };
                debug!("Parsed '{}', exporting {} format(s)", name, formats.len());

                for &format in formats.iter() {
                    let tx = tx.clone();
                    let dispatcher = Arc::clone(&dispatcher);
                    let mesh = Arc::clone(&mesh);
                    let name = name.clone();

                    tokio::spawn(async move {
                        let outcome = match dispatcher.export(mesh, &name, format).await {
                            Ok(artifact) => ConversionOutcome::Exported(artifact),
                            Err(err) => ConversionOutcome::ExportFailed(err),
                        };
                        // The receiver may have been dropped by an impatient caller.
                        let _ = tx.send(outcome);
                    });
                }
            });
        }

        Ok(rx)
    }

    /// Convert everything and gather the outcomes.
    pub async fn run(
        &self,
        documents: Vec<Document>,
        formats: &[FormatKind],
    ) -> Result<ArtifactCollection, ExportError> {
        let mut rx = self.spawn(documents, formats)?;
        let collection = ArtifactCollection::new();
        while let Some(outcome) = rx.recv().await {
            collection.push(outcome);
        }
        Ok(collection)
    }
}
