//! Configuration loading from `fqbench.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fastq_bench::Markers;
use fastq_bench::chart::ChartStyle;
use serde::Deserialize;

/// File looked up in the current directory when `--config` is not given.
const CONFIG_FILE: &str = "fqbench.toml";

/// Resolved tool configuration. Every field falls back to its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Transcript markers.
    pub markers: Markers,
    /// Chart appearance.
    pub chart: ChartStyle,
    /// Where this configuration came from, if anywhere.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load from `explicit`, else `./fqbench.toml`, else defaults.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        let default = Path::new(CONFIG_FILE);
        if default.is_file() {
            return Self::from_path(default);
        }
        Ok(Self::default())
    }

    /// Parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("invalid fqbench configuration")?;
        config.markers.validate()?;
        Ok(config)
    }
}
