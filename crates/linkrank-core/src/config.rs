//! Rank parameters and their file-based resolution.
//!
//! Precedence (highest wins):
//! 1. explicit overrides from the caller (CLI flags)
//! 2. an explicit config file (`--config`)
//! 3. `./linkrank.toml` in the working directory
//! 4. `$CONFIG_DIR/linkrank/config.toml` (user file)
//! 5. built-in defaults (damping 0.85, 20 iterations)
//!
//! Each file may set any subset of keys; unset keys fall through to the next
//! layer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on the iteration count accepted by [`RankConfig::validate`].
pub const MAX_ITERATIONS: usize = 10_000;

/// Name of the project-local config file.
pub const PROJECT_CONFIG_FILE: &str = "linkrank.toml";

/// Parameters consumed by the PageRank engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Probability of following a link rather than jumping uniformly.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Exact number of power iterations; there is no early exit.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            iterations: default_iterations(),
        }
    }
}

/// Rejected rank parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("damping must be a finite number, got {0}")]
    NonFiniteDamping(f64),
    #[error("damping must be within [0, 1], got {0}")]
    DampingOutOfRange(f64),
    #[error("iterations must be at most {max}, got {0}", max = MAX_ITERATIONS)]
    TooManyIterations(usize),
}

impl RankConfig {
    #[must_use]
    pub const fn new(damping: f64, iterations: usize) -> Self {
        Self {
            damping,
            iterations,
        }
    }

    /// Check that the parameters are in the recognized range.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.damping.is_finite() {
            return Err(ConfigError::NonFiniteDamping(self.damping));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::DampingOutOfRange(self.damping));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations(self.iterations));
        }
        Ok(())
    }

    /// Overlay the keys set in `layer` onto `self`.
    #[must_use]
    pub fn merged(self, layer: &ConfigLayer) -> Self {
        Self {
            damping: layer.damping.unwrap_or(self.damping),
            iterations: layer.iterations.unwrap_or(self.iterations),
        }
    }
}

/// A partially specified config, as read from one file or one set of flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub damping: Option<f64>,
    #[serde(default)]
    pub iterations: Option<usize>,
}

/// Read one config layer from `path`. A missing file yields an empty layer.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_layer(path: &Path) -> Result<ConfigLayer> {
    if !path.exists() {
        return Ok(ConfigLayer::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let layer = toml::from_str::<ConfigLayer>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), ?layer, "config layer loaded");
    Ok(layer)
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linkrank/config.toml"))
}

/// Resolve the effective [`RankConfig`] for a run rooted at `project_root`.
///
/// `explicit` is a config file named by the caller; unlike the implicit
/// files it must exist. `overrides` sits on top of every file.
///
/// # Errors
///
/// Returns an error if any file fails to parse, the explicit file is
/// missing, or the merged result is out of range.
pub fn resolve_config(
    project_root: &Path,
    explicit: Option<&Path>,
    overrides: &ConfigLayer,
) -> Result<RankConfig> {
    let mut config = RankConfig::default();

    if let Some(user_path) = user_config_path() {
        config = config.merged(&load_layer(&user_path)?);
    }

    config = config.merged(&load_layer(&project_root.join(PROJECT_CONFIG_FILE))?);

    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        config = config.merged(&load_layer(path)?);
    }

    config = config.merged(overrides);
    config.validate()?;
    Ok(config)
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_iterations() -> usize {
    20
}
