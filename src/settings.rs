//! Converter settings with persistence
//!
//! Settings are read from `~/.config/brickmesh/settings.toml` unless another
//! file is given on the command line. Command-line flags override them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use brickmesh_export::FormatKind;

/// All converter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub input: InputSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("brickmesh"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the default location, or return defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("Could not determine config directory");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Where and how artifacts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory artifacts are written to
    pub directory: PathBuf,
    /// Formats to export when none are given on the command line
    pub formats: Vec<FormatKind>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            formats: vec![FormatKind::Gltf],
        }
    }
}

/// Which files are picked up from input directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Accepted file extensions, without the dot
    pub extensions: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["ldr".to_string(), "dat".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output.formats, vec![FormatKind::Gltf]);
        assert_eq!(settings.output.directory, PathBuf::from("."));
        assert_eq!(settings.input.extensions, ["ldr", "dat"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings =
            toml::from_str("[output]\nformats = [\"glb\", \"stl\"]\n").unwrap();
        assert_eq!(settings.output.formats, vec![FormatKind::Glb, FormatKind::Stl]);
        assert_eq!(settings.output.directory, PathBuf::from("."));
        assert_eq!(settings.input, InputSettings::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.output.formats = vec![FormatKind::Obj];
        settings.output.directory = PathBuf::from("out");
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[output]\nformats = [\"fbx\"]\n").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.toml")),
            Settings::default()
        );
    }
}
