//! The fixed-point iterator.

use amoeba_base::{ClauseModel, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::assignment::Assignment;
use crate::noise::{NoiseKind, NoiseSource};
use crate::rules::RuleSet;
use crate::state::{is_converged, UnitState};

/// Default bias towards non-supply.
pub const DEFAULT_ETA: f64 = 0.1;

/// Configuration for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmoebaConfig {
    /// Supply bias in `(0, 1)`; larger values bounce units back more often.
    pub eta: f64,
    /// Stimulation strategy.
    pub noise: NoiseKind,
    /// Maximum number of iterations (None = unbounded).
    pub max_iterations: Option<u64>,
    /// Wall-clock budget (None = unbounded).
    pub deadline: Option<Duration>,
    /// RNG seed (None = seeded from the OS).
    pub seed: Option<u64>,
}

impl Default for AmoebaConfig {
    fn default() -> Self {
        Self {
            eta: DEFAULT_ETA,
            noise: NoiseKind::default(),
            max_iterations: None,
            deadline: None,
            seed: None,
        }
    }
}

impl AmoebaConfig {
    /// Checks parameter domains.
    pub fn validate(&self) -> Result<()> {
        if !(self.eta > 0.0 && self.eta < 1.0) {
            return Err(Error::InvalidParameter {
                name: "eta",
                message: format!("{} is not in (0, 1)", self.eta),
            });
        }
        if self.max_iterations == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Why a run stopped without converging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The iteration cap was reached.
    IterationCap(u64),
    /// The wall-clock budget ran out.
    Deadline(Duration),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IterationCap(cap) => write!(f, "iteration cap of {cap} reached"),
            Self::Deadline(budget) => write!(f, "deadline of {budget:?} exceeded"),
        }
    }
}

/// A converged run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The assignment encoded by the fixed point.
    pub assignment: Assignment,
    /// Iterations taken to converge.
    pub iterations: u64,
}

/// A run that ran out of budget.
#[derive(Debug, Clone)]
pub struct Exhaustion {
    /// Iterations performed.
    pub iterations: u64,
    /// Which budget ran out.
    pub reason: StopReason,
    /// The assignment as read at the last iteration.
    pub last_assignment: Assignment,
}

/// The result of a run.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// The population reached a fixed point.
    Converged(Solution),
    /// Not converged within budget.
    Exhausted(Exhaustion),
}

impl SolveOutcome {
    /// Returns whether the run converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// Returns the number of iterations performed.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        match self {
            Self::Converged(s) => s.iterations,
            Self::Exhausted(e) => e.iterations,
        }
    }

    /// Returns the final (or last observed) assignment.
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        match self {
            Self::Converged(s) => &s.assignment,
            Self::Exhausted(e) => &e.last_assignment,
        }
    }
}

/// Cumulative counters of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStats {
    /// Number of iterations performed.
    pub iterations: u64,
    /// Unit-steps with resource supplied.
    pub supplied: u64,
    /// Unit-steps bounced back.
    pub bounced: u64,
    /// Unit-steps ending inhibited.
    pub inhibited: u64,
}

/// The amoeba solver: owns one population and iterates it to a fixed point.
///
/// Rules are shared through an `Arc`, so many solvers for the same instance
/// can run in parallel without copying them.
pub struct AmoebaSolver {
    /// Compiled rules.
    rules: Arc<RuleSet>,
    /// Unit population.
    state: UnitState,
    /// Variable values read from the population.
    assignment: Assignment,
    /// Noise stream.
    noise: NoiseSource,
    /// Configuration.
    config: AmoebaConfig,
    /// Statistics.
    stats: SolverStats,
}

impl AmoebaSolver {
    /// Creates a solver over already compiled rules.
    pub fn new(rules: Arc<RuleSet>, config: AmoebaConfig) -> Result<Self> {
        config.validate()?;
        if rules.num_vars() == 0 {
            return Err(Error::Precondition("variable count must be at least 1".to_string()));
        }

        let noise = match config.seed {
            Some(seed) => NoiseSource::seeded(config.noise, seed),
            None => NoiseSource::from_entropy(config.noise),
        };

        Ok(Self {
            state: UnitState::new(rules.num_vars()),
            assignment: Assignment::new(rules.num_vars()),
            rules,
            noise,
            config,
            stats: SolverStats::default(),
        })
    }

    /// Compiles the rules for `model` and creates a solver over them.
    pub fn from_model(model: &ClauseModel, config: AmoebaConfig) -> Result<Self> {
        Self::new(Arc::new(RuleSet::compile(model)), config)
    }

    /// Runs one iteration and returns whether the population has converged.
    ///
    /// Steps run strictly in order, each reading only what the previous one
    /// finalized: noise, supply, activation, inhibition, assignment, check.
    pub fn step(&mut self) -> bool {
        self.stats.iterations += 1;
        let iteration = self.stats.iterations;

        self.noise.fill(iteration, self.state.noise_mut());
        let supplied = self.state.update_supply(self.config.eta);
        self.state.update_activation();
        let inhibited = self.state.update_inhibition(&self.rules);
        self.assignment.update(&self.state);

        let units = self.state.num_units();
        self.stats.supplied += supplied as u64;
        self.stats.bounced += (units - supplied) as u64;
        self.stats.inhibited += inhibited as u64;

        tracing::trace!(iteration, supplied, inhibited, "step");
        is_converged(&self.state)
    }

    /// Iterates until convergence or until a budget runs out.
    ///
    /// Budgets are checked between iterations. Calling `solve` again resumes
    /// from the current state; the iteration count keeps accumulating.
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        let start = Instant::now();
        tracing::debug!(
            units = self.state.num_units(),
            eta = self.config.eta,
            noise = %self.config.noise,
            "starting run"
        );

        loop {
            if let Some(reason) = self.budget_exhausted(start) {
                self.state.check_invariants()?;
                tracing::debug!(iterations = self.stats.iterations, %reason, "run exhausted");
                return Ok(SolveOutcome::Exhausted(Exhaustion {
                    iterations: self.stats.iterations,
                    reason,
                    last_assignment: self.assignment.clone(),
                }));
            }

            if self.step() {
                self.state.check_invariants()?;
                tracing::debug!(iterations = self.stats.iterations, "converged");
                return Ok(SolveOutcome::Converged(Solution {
                    assignment: self.assignment.clone(),
                    iterations: self.stats.iterations,
                }));
            }
        }
    }

    fn budget_exhausted(&self, start: Instant) -> Option<StopReason> {
        if let Some(cap) = self.config.max_iterations {
            if self.stats.iterations >= cap {
                return Some(StopReason::IterationCap(cap));
            }
        }
        if let Some(budget) = self.config.deadline {
            if start.elapsed() >= budget {
                return Some(StopReason::Deadline(budget));
            }
        }
        None
    }

    /// Returns whether the current state is a fixed point.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        is_converged(&self.state)
    }

    /// Returns the unit population.
    pub fn state(&self) -> &UnitState {
        &self.state
    }

    /// Returns the current assignment.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Returns the compiled rules.
    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AmoebaConfig {
        &self.config
    }

    /// Returns solver statistics.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ClauseModel {
        ClauseModel::from_dimacs(3, &[vec![1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(AmoebaConfig::default().validate().is_ok());
        for eta in [0.0, 1.0, -0.5, f64::NAN] {
            let config = AmoebaConfig { eta, ..Default::default() };
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidParameter { name: "eta", .. })
            ));
        }
        let config = AmoebaConfig {
            max_iterations: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_solver_rejects_bad_config() {
        let config = AmoebaConfig { eta: 1.5, ..Default::default() };
        assert!(AmoebaSolver::from_model(&model(), config).is_err());
    }

    #[test]
    fn test_step_counts() {
        let config = AmoebaConfig { seed: Some(3), ..Default::default() };
        let mut solver = AmoebaSolver::from_model(&model(), config).unwrap();
        solver.step();
        solver.step();

        let stats = solver.stats();
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.supplied + stats.bounced, 2 * 6);
    }

    #[test]
    fn test_iteration_cap() {
        // Every sign pattern over three variables: unsatisfiable, so the
        // population can never settle.
        let clauses: Vec<Vec<i64>> = (0..8)
            .map(|mask| {
                (1..=3)
                    .map(|v| if mask & (1 << (v - 1)) != 0 { -v } else { v })
                    .collect()
            })
            .collect();
        let model = ClauseModel::from_dimacs(3, &clauses).unwrap();
        let config = AmoebaConfig {
            max_iterations: Some(500),
            seed: Some(1),
            ..Default::default()
        };
        let mut solver = AmoebaSolver::from_model(&model, config).unwrap();

        match solver.solve().unwrap() {
            SolveOutcome::Exhausted(e) => {
                assert_eq!(e.iterations, 500);
                assert_eq!(e.reason, StopReason::IterationCap(500));
            }
            SolveOutcome::Converged(_) => panic!("unsatisfiable instance converged"),
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let config = AmoebaConfig {
            seed: Some(9),
            max_iterations: Some(10_000),
            ..Default::default()
        };
        let mut solver = AmoebaSolver::from_model(&model(), config).unwrap();
        let outcome = solver.solve().unwrap();
        assert!(outcome.is_converged());
        assert_eq!(outcome.iterations(), solver.stats().iterations);
        assert_eq!(outcome.assignment(), solver.assignment());
        assert!(solver.is_converged());
    }
}
