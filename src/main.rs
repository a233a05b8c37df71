//! Brickmesh - LDraw to glTF/GLB/OBJ/STL converter
//!
//! This is the command-line entry point: it gathers input documents, runs
//! them through the conversion pipeline and writes the artifacts to disk.

mod settings;
mod sink;
mod sources;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use brickmesh_export::{
    ArtifactCollection, ConversionOutcome, ExportDispatcher, FormatKind, Pipeline,
};

use crate::settings::Settings;
use crate::sink::DirectorySink;

/// Convert LDraw triangle and quad geometry into 3D interchange formats.
#[derive(Debug, Parser)]
#[command(name = "brickmesh", version, about)]
struct Args {
    /// LDraw files or directories of .ldr/.dat files; reads stdin when omitted
    inputs: Vec<PathBuf>,

    /// Output format (gltf, glb, obj, stl); repeat for several
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<FormatKind>,

    /// Directory to write artifacts to
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective settings to the settings file and exit
    #[arg(long)]
    init_config: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Requested formats in first-mention order, falling back to settings.
    fn formats(&self, settings: &Settings) -> Vec<FormatKind> {
        let requested = if self.formats.is_empty() {
            &settings.output.formats
        } else {
            &self.formats
        };

        let mut formats = Vec::new();
        for &format in requested {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    if args.init_config {
        let path = args
            .config
            .clone()
            .or_else(Settings::default_path)
            .context("Could not determine config directory")?;
        settings.save_to(&path)?;
        return Ok(ExitCode::SUCCESS);
    }

    let formats = args.formats(&settings);
    if formats.is_empty() {
        anyhow::bail!("No output formats configured");
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| settings.output.directory.clone());

    let mut failures = 0;
    let documents = if args.inputs.is_empty() {
        info!("Reading LDraw data from stdin");
        vec![sources::read_stdin()?]
    } else {
        let discovered = sources::discover(&args.inputs, &settings.input.extensions);
        for e in &discovered.failures {
            error!("{:#}", e);
        }
        failures += discovered.failures.len();

        let mut documents = Vec::with_capacity(discovered.files.len());
        for path in &discovered.files {
            match sources::read_document(path) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    error!("{:#}", e);
                    failures += 1;
                }
            }
        }
        documents
    };

    if documents.is_empty() {
        warn!("No LDraw files to convert");
    }
    info!(
        "Converting {} document(s) to {}",
        documents.len(),
        formats
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut sink = DirectorySink::create(&output)?;
    let pipeline = Pipeline::new(ExportDispatcher::with_default_encoders());
    let mut outcomes = pipeline.spawn(documents, &formats)?;

    let collection = ArtifactCollection::new();
    while let Some(outcome) = outcomes.recv().await {
        match &outcome {
            ConversionOutcome::Exported(artifact) => {
                if let Err(e) = sink.write(artifact) {
                    error!("{:#}", e);
                    failures += 1;
                }
            }
            ConversionOutcome::ParseFailed(e) => error!("{}", e),
            ConversionOutcome::ExportFailed(e) => error!("{}", e),
        }
        collection.push(outcome);
    }

    failures += collection.failure_count();
    info!(
        "Finished: {} artifact(s) in {:?}, {} failure(s)",
        collection.artifact_count(),
        sink.directory(),
        failures
    );

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_fall_back_to_settings_and_dedupe() {
        let settings = Settings::default();

        let args = Args::parse_from(["brickmesh", "model.ldr"]);
        assert_eq!(args.formats(&settings), vec![FormatKind::Gltf]);

        let args = Args::parse_from(["brickmesh", "-f", "stl", "--format", "GLB", "-f", "stl"]);
        assert_eq!(args.formats(&settings), vec![FormatKind::Stl, FormatKind::Glb]);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["brickmesh", "-f", "fbx"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::parse_from(["brickmesh", "-vv", "-o", "out", "a.ldr", "dir"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.inputs.len(), 2);
    }
}
