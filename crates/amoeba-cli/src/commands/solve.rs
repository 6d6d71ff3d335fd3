//! Solve command.

use super::{load_instance, parse_noise};
use crate::config::CliConfig;
use amoeba_core::{AmoebaConfig, AmoebaSolver, ClauseReport, ClauseValidator, SolveOutcome};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Args, Debug, Default)]
pub struct SolveArgs {
    /// Input DIMACS CNF file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Supply bias in (0, 1)
    #[arg(long)]
    pub eta: Option<f64>,

    /// Noise source
    #[arg(long, value_parser = ["brownian", "logistic"])]
    pub noise: Option<String>,

    /// Maximum number of iterations
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drop clauses shorter than this many literals (1 keeps every clause)
    #[arg(long)]
    pub min_clause_len: Option<usize>,

    /// Output file for the model line
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What a single solve produced.
#[derive(Debug)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub clauses: ClauseReport,
    pub elapsed: Duration,
}

impl SolveReport {
    /// The status line in SAT-competition style.
    pub fn status_line(&self) -> String {
        match &self.outcome {
            SolveOutcome::Converged(_) => "s SATISFIABLE".to_string(),
            SolveOutcome::Exhausted(e) => format!("s UNKNOWN ({})", e.reason),
        }
    }

    /// The model line, `v <lits> 0`.
    pub fn model_line(&self) -> String {
        let lits: Vec<String> = self
            .outcome
            .assignment()
            .to_dimacs()
            .iter()
            .map(|l| l.to_string())
            .collect();
        format!("v {} 0", lits.join(" "))
    }
}

/// Builds the run configuration; flags override the config file.
fn solver_config(args: &SolveArgs, config: &CliConfig) -> anyhow::Result<AmoebaConfig> {
    let defaults = &config.solve;
    Ok(AmoebaConfig {
        eta: args.eta.unwrap_or(defaults.eta),
        noise: parse_noise(args.noise.as_deref(), defaults.noise)?,
        max_iterations: args.max_iterations.or(defaults.max_iterations),
        deadline: args.timeout.or(defaults.timeout_secs).map(Duration::from_secs),
        seed: args.seed,
    })
}

/// Loads the instance and runs one solver to completion.
pub fn execute(args: &SolveArgs, config: &CliConfig) -> anyhow::Result<SolveReport> {
    tracing::info!("Loading problem from {:?}", args.input);
    let min_clause_len = args.min_clause_len.unwrap_or(config.solve.min_clause_len);
    let instance = load_instance(&args.input, min_clause_len)?;

    let resolved = solver_config(args, config)?;
    let mut solver = AmoebaSolver::from_model(&instance.model, resolved)?;

    let start = Instant::now();
    let outcome = solver.solve()?;
    let elapsed = start.elapsed();

    let clauses = ClauseValidator::check(&instance.model, outcome.assignment());
    tracing::info!("Finished after {} iterations in {:?}", outcome.iterations(), elapsed);
    tracing::debug!(stats = ?solver.stats(), "solver statistics");

    Ok(SolveReport {
        outcome,
        clauses,
        elapsed,
    })
}

pub fn run(args: SolveArgs, config: &CliConfig) -> anyhow::Result<()> {
    let report = execute(&args, config)?;

    println!("{}", report.status_line());
    println!("{}", report.model_line());
    println!("c iterations: {}", report.outcome.iterations());
    println!("c clauses satisfied/unsatisfied: {}", report.clauses);
    println!("c Time: {:.3}s", report.elapsed.as_secs_f64());

    if let Some(output) = &args.output {
        fs::write(output, format!("{}\n", report.model_line()))?;
        tracing::info!("Model written to {:?}", output);
    }

    Ok(())
}
