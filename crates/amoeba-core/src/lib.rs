//! # amoeba-core
//!
//! Amoeba-inspired stochastic heuristic for Boolean satisfiability.
//!
//! Every variable is modelled by two competing units. Their activation states
//! evolve under random (Brownian) or chaotic (logistic map) stimulation and
//! under inhibition rules derived from the clauses, until the population
//! settles on a fixed point that encodes a satisfying assignment.
//!
//! Implements:
//! - Rule compilation (INTRA, INTER and CONTRA rule sets)
//! - Noise sources (Brownian, logistic)
//! - The per-iteration supply/activation/inhibition pipeline
//! - Assignment extraction, convergence checking and clause validation
//!
//! The heuristic is incomplete: it cannot prove unsatisfiability, so every
//! run should carry an iteration cap or a deadline.

pub mod assignment;
pub mod noise;
pub mod rules;
pub mod solver;
pub mod state;
pub mod validate;

pub use assignment::Assignment;
pub use noise::{NoiseKind, NoiseSource};
pub use rules::{ContraRule, InterRule, IntraRule, RuleSet};
pub use solver::{
    AmoebaConfig, AmoebaSolver, Exhaustion, Solution, SolveOutcome, SolverStats, StopReason,
};
pub use state::{is_converged, UnitState};
pub use validate::{ClauseReport, ClauseValidator};
