//! Persistence of the last successful location source between runs.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// The source that produced the last successful resolution.
///
/// A coordinate and a city name are mutually exclusive by construction:
/// saving one replaces the other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastKnownSource {
    Coordinate { latitude: f64, longitude: f64 },
    City { name: String },
    #[default]
    None,
}

/// TOML-backed store for [`LastKnownSource`], written after each successful
/// resolution and read at startup.
#[derive(Debug, Clone)]
pub struct SourceStore {
    path: PathBuf,
}

impl SourceStore {
    /// Store backed by the platform config directory.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(Self { path: dirs.config_dir().join("last_location.toml") })
    }

    /// Store backed by an explicit file path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the last known source, or [`LastKnownSource::None`] when nothing
    /// has been saved yet.
    pub fn load(&self) -> Result<LastKnownSource> {
        if !self.path.exists() {
            return Ok(LastKnownSource::None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let source: LastKnownSource = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(source)
    }

    /// Save the source, creating parent directories as needed.
    pub fn save(&self, source: &LastKnownSource) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(source).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}
