//! CLI configuration.
//!
//! Defaults can be read from a TOML file; command-line flags always win.
//!
//! ```toml
//! [solve]
//! eta = 0.1
//! noise = "brownian"
//! max_iterations = 1000000
//!
//! [trials]
//! trials = 500
//! etas = [0.05, 0.1, 0.15, 0.2, 0.25]
//! noise = "logistic"
//! ```

use amoeba_core::solver::DEFAULT_ETA;
use amoeba_core::NoiseKind;
use amoeba_format::dimacs::DEFAULT_MIN_CLAUSE_LEN;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults for `amoeba solve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveDefaults {
    pub eta: f64,
    pub noise: NoiseKind,
    pub max_iterations: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub min_clause_len: usize,
}

impl Default for SolveDefaults {
    fn default() -> Self {
        Self {
            eta: DEFAULT_ETA,
            noise: NoiseKind::Brownian,
            max_iterations: None,
            timeout_secs: None,
            min_clause_len: DEFAULT_MIN_CLAUSE_LEN,
        }
    }
}

/// Defaults for `amoeba trials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialDefaults {
    /// Runs per instance and eta.
    pub trials: usize,
    /// Eta values swept.
    pub etas: Vec<f64>,
    pub noise: NoiseKind,
    /// Per-run iteration cap.
    pub max_iterations: Option<u64>,
    /// Parallel workers (0 = all cores).
    pub workers: usize,
    pub min_clause_len: usize,
}

impl Default for TrialDefaults {
    fn default() -> Self {
        Self {
            trials: 500,
            etas: vec![0.05, 0.1, 0.15, 0.2, 0.25],
            noise: NoiseKind::Logistic,
            max_iterations: Some(1_000_000),
            workers: 0,
            min_clause_len: DEFAULT_MIN_CLAUSE_LEN,
        }
    }
}

/// CLI configuration loaded from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub solve: SolveDefaults,
    pub trials: TrialDefaults,
}

impl CliConfig {
    /// Loads configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
