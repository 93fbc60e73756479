use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ipf_core::{ChunkConfig, DEFAULT_CIRCLE_STEPS, Evaluation};
use serde::{Deserialize, Serialize};

/// Settings read from an optional TOML file. Every field has a default, and
/// command-line flags override whatever the file says.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Read and write angles in degrees.
    pub degrees: bool,
    pub outer: OuterConfig,
    pub circle: CircleConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OuterConfig {
    pub chunked: bool,
    #[serde(flatten)]
    pub chunk: ChunkConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CircleConfig {
    pub steps: usize,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_CIRCLE_STEPS,
        }
    }
}

impl Config {
    /// Load from `path`, or from `IPF_CONFIG` when no path is given.
    /// No file at all means defaults; a named file that is missing is an
    /// error.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("IPF_CONFIG").map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn evaluation(&self) -> Evaluation {
        if self.outer.chunked {
            Evaluation::Chunked(self.outer.chunk)
        } else {
            Evaluation::Eager
        }
    }
}
