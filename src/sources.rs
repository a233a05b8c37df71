//! Input discovery: turns command-line paths into documents.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use brickmesh_export::Document;

/// Files found on the command line, plus the inputs that could not be used.
#[derive(Debug, Default)]
pub struct Discovered {
    pub files: Vec<PathBuf>,
    pub failures: Vec<anyhow::Error>,
}

/// Collect input files. Directories contribute their direct file entries with
/// an accepted extension, in name order; subdirectories are not entered.
pub fn discover(inputs: &[PathBuf], extensions: &[String]) -> Discovered {
    let mut discovered = Discovered::default();

    for input in inputs {
        if input.is_dir() {
            match directory_entries(input, extensions) {
                Ok(mut files) => {
                    debug!("{} input file(s) in {:?}", files.len(), input);
                    discovered.files.append(&mut files);
                }
                Err(e) => discovered.failures.push(e),
            }
        } else if input.is_file() {
            if has_accepted_extension(input, extensions) {
                discovered.files.push(input.clone());
            } else {
                warn!("Skipping {:?}: not an LDraw file", input);
            }
        } else {
            discovered
                .failures
                .push(anyhow::anyhow!("input {:?} does not exist", input));
        }
    }

    discovered
}

fn directory_entries(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))? {
        let path = entry
            .with_context(|| format!("Failed to read entry in {:?}", dir))?
            .path();
        if path.is_file() && has_accepted_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Case-insensitive match of the path's last extension.
pub fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext)))
}

/// Artifact base name for an input file: the file name up to its first dot.
pub fn base_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "untitled".to_string(),
    }
}

pub fn read_document(path: &Path) -> Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(Document::new(base_name(path), text))
}

/// Read the whole of stdin as a pasted document.
pub fn read_stdin() -> Result<Document> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read LDraw data from stdin")?;
    Ok(Document::pasted(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["ldr".to_string(), "dat".to_string()]
    }

    #[test]
    fn base_name_stops_at_first_dot() {
        assert_eq!(base_name(Path::new("/models/car.ldr")), "car");
        assert_eq!(base_name(Path::new("3001.part.dat")), "3001");
        assert_eq!(base_name(Path::new(".ldr")), "untitled");
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let exts = extensions();
        assert!(has_accepted_extension(Path::new("a.LDR"), &exts));
        assert!(has_accepted_extension(Path::new("a.dat"), &exts));
        assert!(!has_accepted_extension(Path::new("a.mpd"), &exts));
        assert!(!has_accepted_extension(Path::new("ldr"), &exts));
    }

    #[test]
    fn directory_contributes_direct_ldraw_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ldr"), "").unwrap();
        fs::write(dir.path().join("a.dat"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.ldr"), "").unwrap();

        let found = discover(&[dir.path().to_path_buf()], &extensions());
        let names: Vec<_> = found
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.dat", "b.ldr"]);
        assert!(found.failures.is_empty());
    }

    #[test]
    fn explicit_files_are_filtered_and_missing_inputs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let ldr = dir.path().join("model.ldr");
        let txt = dir.path().join("readme.txt");
        fs::write(&ldr, "").unwrap();
        fs::write(&txt, "").unwrap();

        let found = discover(
            &[ldr.clone(), txt, dir.path().join("missing.ldr")],
            &extensions(),
        );
        assert_eq!(found.files, vec![ldr]);
        assert_eq!(found.failures.len(), 1);
    }

    #[test]
    fn read_document_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.ldr");
        fs::write(&path, "3 4 0 0 0 1 0 0 0 1 0\n").unwrap();

        let document = read_document(&path).unwrap();
        assert_eq!(document.name, "wall");
        assert!(document.text.starts_with("3 4"));
    }
}
