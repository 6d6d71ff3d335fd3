//! Subcommands.

pub mod solve;
pub mod trials;

use amoeba_base::ClauseModel;
use amoeba_core::NoiseKind;
use amoeba_format::{DimacsCnf, LoadOptions};
use anyhow::Context;
use std::fs::File;
use std::path::Path;

/// A loaded instance.
pub struct Instance {
    pub model: ClauseModel,
    /// Clauses discarded for being shorter than the retention threshold.
    pub dropped_clauses: usize,
}

/// Loads a DIMACS file into a validated clause model.
pub fn load_instance(path: &Path, min_clause_len: usize) -> anyhow::Result<Instance> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let cnf = DimacsCnf::from_reader_with(file, LoadOptions { min_clause_len })
        .with_context(|| format!("parsing {}", path.display()))?;
    if cnf.dropped_clauses > 0 {
        tracing::warn!(
            "{}: dropped {} clause(s) shorter than {} literals",
            path.display(),
            cnf.dropped_clauses,
            min_clause_len
        );
    }
    let model = cnf
        .to_clause_model()
        .with_context(|| format!("validating {}", path.display()))?;
    tracing::info!(
        "Loaded {}: {} vars, {} clauses",
        path.display(),
        model.num_vars(),
        model.clauses().len()
    );
    Ok(Instance {
        model,
        dropped_clauses: cnf.dropped_clauses,
    })
}

/// Parses a `--noise` value, already restricted by clap to known names.
pub fn parse_noise(value: Option<&str>, default: NoiseKind) -> anyhow::Result<NoiseKind> {
    match value {
        Some(name) => name.parse().map_err(|e: String| anyhow::anyhow!(e)),
        None => Ok(default),
    }
}
