//! End-to-end tests for the amoeba solver.

use amoeba_base::{ClauseModel, UnitId};
use amoeba_core::{
    AmoebaConfig, AmoebaSolver, ClauseValidator, NoiseKind, RuleSet, SolveOutcome, StopReason,
    UnitState,
};
use amoeba_format::DimacsCnf;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Helpers
// =============================================================================

/// Random 3-SAT instance with a hidden satisfying assignment.
fn planted_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> ClauseModel {
    let mut rng = StdRng::seed_from_u64(seed);
    let hidden: Vec<bool> = (0..num_vars).map(|_| rng.gen()).collect();
    let vars: Vec<i64> = (1..=num_vars as i64).collect();

    let mut clauses = Vec::with_capacity(num_clauses);
    while clauses.len() < num_clauses {
        let clause: Vec<i64> = vars
            .choose_multiple(&mut rng, 3)
            .map(|&v| if rng.gen() { v } else { -v })
            .collect();
        if clause.iter().any(|&l| (l > 0) == hidden[(l.abs() - 1) as usize]) {
            clauses.push(clause);
        }
    }
    ClauseModel::from_dimacs(num_vars, &clauses).unwrap()
}

fn config(noise: NoiseKind, seed: u64) -> AmoebaConfig {
    AmoebaConfig {
        noise,
        seed: Some(seed),
        max_iterations: Some(100_000),
        ..Default::default()
    }
}

/// Every sign pattern over three variables.
fn unsat_model() -> ClauseModel {
    let clauses: Vec<Vec<i64>> = (0..8)
        .map(|mask| {
            (1..=3)
                .map(|v| if mask & (1 << (v - 1)) != 0 { -v } else { v })
                .collect()
        })
        .collect();
    ClauseModel::from_dimacs(3, &clauses).unwrap()
}

fn assert_fixed_point(state: &UnitState, num_vars: usize) {
    for idx in 0..num_vars {
        let var = amoeba_base::Var::from_index(idx);
        let t = UnitId::true_unit(var);
        let f = UnitId::false_unit(var);
        let settled = |on: UnitId, off: UnitId| {
            state.x(on) == 1 && !state.l(on) && state.x(off) <= 0 && state.l(off)
        };
        assert!(
            settled(t, f) ^ settled(f, t),
            "variable {var} is not settled on exactly one unit"
        );
    }
}

// =============================================================================
// Convergence
// =============================================================================

#[test]
fn test_single_clause_converges() {
    let model = ClauseModel::from_dimacs(3, &[vec![1, 2, 3]]).unwrap();
    let mut config = config(NoiseKind::Brownian, 2024);
    config.eta = 0.1;
    config.max_iterations = Some(10_000);

    let mut solver = AmoebaSolver::from_model(&model, config).unwrap();
    match solver.solve().unwrap() {
        SolveOutcome::Converged(solution) => {
            assert!(solution.iterations < 10_000);
            assert!(solution.assignment.values().iter().any(|&v| v));
        }
        SolveOutcome::Exhausted(e) => panic!("did not converge: {}", e.reason),
    }
}

#[test]
fn test_fixed_point_settles_every_variable() {
    for noise in [NoiseKind::Brownian, NoiseKind::Logistic] {
        for seed in 0..5 {
            let model = planted_3sat(10, 30, seed);
            let mut solver = AmoebaSolver::from_model(&model, config(noise, seed)).unwrap();
            let outcome = solver.solve().unwrap();
            assert!(outcome.is_converged(), "{noise} seed {seed} exhausted");

            assert_fixed_point(solver.state(), model.num_vars());
            assert_eq!(solver.assignment().undetermined().count(), 0);
            assert!(solver.is_converged());
            assert_eq!(solver.is_converged(), solver.is_converged());
        }
    }
}

#[test]
fn test_converged_assignment_satisfies_clauses() {
    for seed in 10..15 {
        let model = planted_3sat(20, 91, seed);
        let mut solver =
            AmoebaSolver::from_model(&model, config(NoiseKind::Brownian, seed)).unwrap();
        let outcome = solver.solve().unwrap();
        assert!(outcome.is_converged(), "seed {seed} exhausted");

        let report = ClauseValidator::check(&model, outcome.assignment());
        assert_eq!(report.unsatisfied, 0);
        assert_eq!(report.satisfied, 91);
    }
}

#[test]
fn test_solve_from_dimacs() {
    let input = r"
c uniform random 3-SAT
p cnf 5 6
1 -2 3 0
-1 2 4 0
2 -3 -5 0
-2 4 5 0
1 2 0
3 -4 5 0
%
0
";
    let cnf = DimacsCnf::from_str(input).unwrap();
    assert_eq!(cnf.dropped_clauses, 1);
    let model = cnf.to_clause_model().unwrap();

    let mut solver = AmoebaSolver::from_model(&model, config(NoiseKind::Logistic, 5)).unwrap();
    let outcome = solver.solve().unwrap();
    assert!(outcome.is_converged());
    assert!(ClauseValidator::check(&model, outcome.assignment()).all_satisfied());
}

// =============================================================================
// Dynamics
// =============================================================================

#[test]
fn test_intra_never_lets_both_units_stay_active() {
    let model = planted_3sat(8, 20, 77);
    let mut solver = AmoebaSolver::from_model(&model, config(NoiseKind::Brownian, 77)).unwrap();

    let mut both_active_prev = vec![false; model.num_vars()];
    for _ in 0..2_000 {
        let converged = solver.step();
        let state = solver.state();
        for var in model.vars() {
            let t = UnitId::true_unit(var);
            let f = UnitId::false_unit(var);
            let both = state.is_active(t) && state.is_active(f);
            if both {
                assert!(state.l(t) && state.l(f), "both units of {var} active but not inhibited");
            }
            assert!(
                !(both && both_active_prev[var.index()]),
                "both units of {var} stayed active"
            );
            if converged {
                assert!(!both);
            }
            both_active_prev[var.index()] = both;
        }
        state.check_invariants().unwrap();
    }
}

#[test]
fn test_activation_stays_clamped() {
    let mut solver =
        AmoebaSolver::from_model(&unsat_model(), config(NoiseKind::Logistic, 8)).unwrap();
    for _ in 0..1_000 {
        solver.step();
        assert!(solver.state().activations().iter().all(|x| (-1..=1).contains(x)));
    }
}

// =============================================================================
// Reproducibility
// =============================================================================

#[test]
fn test_seeded_runs_reproduce() {
    let model = planted_3sat(12, 40, 3);
    let rules = Arc::new(RuleSet::compile(&model));

    for noise in [NoiseKind::Brownian, NoiseKind::Logistic] {
        let mut a = AmoebaSolver::new(rules.clone(), config(noise, 99)).unwrap();
        let mut b = AmoebaSolver::new(rules.clone(), config(noise, 99)).unwrap();
        for _ in 0..200 {
            a.step();
            b.step();
            assert_eq!(a.state().noise(), b.state().noise());
            assert_eq!(a.state().activations(), b.state().activations());
        }

        let outcome_a = a.solve().unwrap();
        let outcome_b = b.solve().unwrap();
        assert_eq!(outcome_a.iterations(), outcome_b.iterations());
        assert_eq!(outcome_a.assignment(), outcome_b.assignment());
    }
}

#[test]
fn test_parallel_runs_share_rules() {
    let model = planted_3sat(15, 50, 21);
    let rules = Arc::new(RuleSet::compile(&model));

    let outcomes: Vec<SolveOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                let rules = rules.clone();
                scope.spawn(move || {
                    AmoebaSolver::new(rules, config(NoiseKind::Brownian, seed))
                        .and_then(|mut solver| solver.solve())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for outcome in outcomes {
        assert!(outcome.is_converged());
        assert!(ClauseValidator::check(&model, outcome.assignment()).all_satisfied());
    }
}

// =============================================================================
// Budgets
// =============================================================================

#[test]
fn test_unsat_exhausts_iteration_cap() {
    let mut config = config(NoiseKind::Brownian, 4);
    config.max_iterations = Some(2_000);
    let mut solver = AmoebaSolver::from_model(&unsat_model(), config).unwrap();

    let outcome = solver.solve().unwrap();
    assert!(!outcome.is_converged());
    assert_eq!(outcome.iterations(), 2_000);
    match outcome {
        SolveOutcome::Exhausted(e) => assert_eq!(e.reason, StopReason::IterationCap(2_000)),
        SolveOutcome::Converged(_) => unreachable!(),
    }
}

#[test]
fn test_unsat_exhausts_deadline() {
    let config = AmoebaConfig {
        seed: Some(6),
        deadline: Some(Duration::from_millis(20)),
        ..Default::default()
    };
    let mut solver = AmoebaSolver::from_model(&unsat_model(), config).unwrap();

    match solver.solve().unwrap() {
        SolveOutcome::Exhausted(e) => {
            assert_eq!(e.reason, StopReason::Deadline(Duration::from_millis(20)));
            assert_eq!(e.iterations, solver.stats().iterations);
        }
        SolveOutcome::Converged(_) => panic!("unsatisfiable instance converged"),
    }
}
