//! Trials command: repeated runs over a directory and an eta sweep.

use super::{load_instance, parse_noise};
use crate::config::CliConfig;
use amoeba_core::{AmoebaConfig, AmoebaSolver, NoiseKind, RuleSet};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

#[derive(Args, Debug, Default)]
pub struct TrialsArgs {
    /// Input directory containing DIMACS files
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Output directory for results
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Runs per instance and eta
    #[arg(long)]
    pub trials: Option<usize>,

    /// Comma-separated eta values to sweep
    #[arg(long, value_delimiter = ',')]
    pub etas: Option<Vec<f64>>,

    /// Noise source
    #[arg(long, value_parser = ["brownian", "logistic"])]
    pub noise: Option<String>,

    /// Per-run iteration cap
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Base seed; runs are reproducible when set
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of parallel workers (0 = auto)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Drop clauses shorter than this many literals (1 keeps every clause)
    #[arg(long)]
    pub min_clause_len: Option<usize>,
}

/// Resolved sweep parameters.
#[derive(Debug, Clone)]
struct TrialPlan {
    trials: usize,
    etas: Vec<f64>,
    noise: NoiseKind,
    max_iterations: Option<u64>,
    seed: Option<u64>,
    min_clause_len: usize,
}

impl TrialPlan {
    fn resolve(args: &TrialsArgs, config: &CliConfig) -> anyhow::Result<Self> {
        let defaults = &config.trials;
        let plan = Self {
            trials: args.trials.unwrap_or(defaults.trials),
            etas: args.etas.clone().unwrap_or_else(|| defaults.etas.clone()),
            noise: parse_noise(args.noise.as_deref(), defaults.noise)?,
            max_iterations: args.max_iterations.or(defaults.max_iterations),
            seed: args.seed,
            min_clause_len: args.min_clause_len.unwrap_or(defaults.min_clause_len),
        };

        if plan.trials == 0 {
            anyhow::bail!("trials must be at least 1");
        }
        if plan.etas.is_empty() {
            anyhow::bail!("at least one eta value is required");
        }
        for &eta in &plan.etas {
            AmoebaConfig { eta, ..Default::default() }.validate()?;
        }
        Ok(plan)
    }
}

/// Per-eta statistics.
#[derive(Debug, Serialize)]
struct EtaSummary {
    eta: f64,
    converged: usize,
    exhausted: usize,
    mean_iterations: Option<f64>,
    min_iterations: Option<u64>,
    max_iterations: Option<u64>,
}

impl EtaSummary {
    fn from_runs(eta: f64, runs: &[Option<u64>]) -> Self {
        let done: Vec<u64> = runs.iter().flatten().copied().collect();
        let mean_iterations = if done.is_empty() {
            None
        } else {
            Some(done.iter().sum::<u64>() as f64 / done.len() as f64)
        };
        Self {
            eta,
            converged: done.len(),
            exhausted: runs.len() - done.len(),
            mean_iterations,
            min_iterations: done.iter().min().copied(),
            max_iterations: done.iter().max().copied(),
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
struct InstanceSummary {
    file: String,
    variables: usize,
    clauses: usize,
    dropped_clauses: usize,
    noise: NoiseKind,
    trials: usize,
    iteration_cap: Option<u64>,
    time_ms: u128,
    sweeps: Vec<EtaSummary>,
}

pub fn run(args: TrialsArgs, config: &CliConfig) -> anyhow::Result<()> {
    let plan = TrialPlan::resolve(&args, config)?;
    tracing::info!("Starting trials from {:?}", args.input_dir);

    fs::create_dir_all(&args.output_dir)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&args.input_dir).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "cnf") {
            files.push(path.to_owned());
        }
    }
    tracing::info!("Found {} files to process", files.len());

    let workers = args.workers.unwrap_or(config.trials.workers);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;

    let failures: Vec<PathBuf> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|path| match process_file(path, &args.output_dir, &plan) {
                Ok(()) => None,
                Err(e) => {
                    tracing::error!("Failed to process {:?}: {:#}", path, e);
                    Some(path.clone())
                }
            })
            .collect()
    });

    if !failures.is_empty() {
        anyhow::bail!("{} of {} instances failed", failures.len(), files.len());
    }
    tracing::info!("Trials complete");
    Ok(())
}

fn process_file(path: &Path, output_dir: &Path, plan: &TrialPlan) -> anyhow::Result<()> {
    let start = Instant::now();
    let filename = path.file_name().unwrap_or_default().to_string_lossy().to_string();
    let stem = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
    tracing::info!("Processing {}", filename);

    let instance = load_instance(path, plan.min_clause_len)?;
    let rules = Arc::new(RuleSet::compile(&instance.model));

    let instance_dir = output_dir.join(&stem);
    fs::create_dir_all(&instance_dir)?;

    let file_key = fnv1a(filename.as_bytes());
    let mut sweeps = Vec::with_capacity(plan.etas.len());
    for (eta_idx, &eta) in plan.etas.iter().enumerate() {
        let runs = (0..plan.trials)
            .into_par_iter()
            .map(|trial| -> anyhow::Result<Option<u64>> {
                let config = AmoebaConfig {
                    eta,
                    noise: plan.noise,
                    max_iterations: plan.max_iterations,
                    deadline: None,
                    seed: plan.seed.map(|base| trial_seed(base, file_key, eta_idx, trial)),
                };
                let outcome = AmoebaSolver::new(rules.clone(), config)?.solve()?;
                Ok(outcome.is_converged().then(|| outcome.iterations()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        fs::write(instance_dir.join(format!("trials{eta}.csv")), csv_row(&runs))?;
        let summary = EtaSummary::from_runs(eta, &runs);
        tracing::info!(
            "{} eta={}: {}/{} converged, mean {:?}",
            filename,
            eta,
            summary.converged,
            runs.len(),
            summary.mean_iterations
        );
        sweeps.push(summary);
    }

    let summary = InstanceSummary {
        file: filename.clone(),
        variables: instance.model.num_vars(),
        clauses: instance.model.clauses().len(),
        dropped_clauses: instance.dropped_clauses,
        noise: plan.noise,
        trials: plan.trials,
        iteration_cap: plan.max_iterations,
        time_ms: start.elapsed().as_millis(),
        sweeps,
    };
    let f = fs::File::create(instance_dir.join("summary.json"))?;
    serde_json::to_writer_pretty(f, &summary)?;

    tracing::info!("Finished {} in {}ms", filename, summary.time_ms);
    Ok(())
}

/// One CSV row of iteration counts, `NA` for runs that did not converge.
fn csv_row(runs: &[Option<u64>]) -> String {
    let cells: Vec<String> = runs
        .iter()
        .map(|r| r.map_or_else(|| "NA".to_string(), |n| n.to_string()))
        .collect();
    format!("{}\n", cells.join(","))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Derives an independent per-run seed (splitmix64 finalizer).
fn trial_seed(base: u64, file_key: u64, eta_idx: usize, trial: usize) -> u64 {
    let mut z = base
        ^ file_key
        ^ (eta_idx as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (trial as u64).wrapping_mul(0xd1b5_4a32_d192_ed03);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
