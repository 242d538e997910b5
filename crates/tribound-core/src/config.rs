//! Engine configuration.
//!
//! ```toml
//! label = "Person"
//!
//! [trim]
//! max_iterations_per_vertex = 1024
//! sweep = "fixpoint"        # or "single-pass"
//! max_sweeps = 8
//! deadline_ms = 30000       # optional
//!
//! [noise]
//! seed = 42                 # optional; OS entropy when absent
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::TriboundError;
use crate::store::DEFAULT_LABEL;
use crate::trim::{SweepMode, TrimPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Vertex label whose induced subgraph is analysed.
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub trim: TrimConfig,
    #[serde(default)]
    pub noise: NoiseConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            trim: TrimConfig::default(),
            noise: NoiseConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::Config`] on malformed TOML or unknown values.
    pub fn from_toml_str(content: &str) -> Result<Self, TriboundError> {
        toml::from_str(content).map_err(|err| TriboundError::Config(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepKind {
    SinglePass,
    Fixpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations_per_vertex: usize,
    #[serde(default = "default_sweep")]
    pub sweep: SweepKind,
    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: usize,
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            max_iterations_per_vertex: default_max_iterations(),
            sweep: default_sweep(),
            max_sweeps: default_max_sweeps(),
            deadline_ms: None,
        }
    }
}

impl TrimConfig {
    #[must_use]
    pub fn policy(&self) -> TrimPolicy {
        TrimPolicy {
            max_iterations_per_vertex: self.max_iterations_per_vertex,
            sweep: match self.sweep {
                SweepKind::SinglePass => SweepMode::SinglePass,
                SweepKind::Fixpoint => SweepMode::Fixpoint {
                    max_sweeps: self.max_sweeps,
                },
            },
            deadline: self.deadline_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NoiseConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NoiseConfig {
    /// RNG for noise draws: seeded when configured, OS entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// Load engine config from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    EngineConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

const fn default_max_iterations() -> usize {
    1024
}

const fn default_sweep() -> SweepKind {
    SweepKind::Fixpoint
}

const fn default_max_sweeps() -> usize {
    8
}
