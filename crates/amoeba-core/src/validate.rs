//! Clause satisfaction reporting.

use amoeba_base::ClauseModel;
use serde::Serialize;
use std::fmt;
use crate::assignment::Assignment;

/// Counts of clauses with and without a true literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClauseReport {
    pub satisfied: usize,
    pub unsatisfied: usize,
}

impl ClauseReport {
    /// Returns whether every clause is satisfied.
    #[must_use]
    pub fn all_satisfied(&self) -> bool {
        self.unsatisfied == 0
    }
}

impl fmt::Display for ClauseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.satisfied, self.unsatisfied)
    }
}

/// Evaluates clauses under an assignment. Diagnostic only; the solver never
/// consults it.
pub struct ClauseValidator;

impl ClauseValidator {
    /// Counts satisfied and unsatisfied clauses.
    ///
    /// `assignment` must cover every variable of `model`.
    #[must_use]
    pub fn check(model: &ClauseModel, assignment: &Assignment) -> ClauseReport {
        debug_assert_eq!(
            assignment.len(),
            model.num_vars(),
            "assignment does not match the model's variable count"
        );
        let satisfied = model
            .clauses()
            .iter()
            .filter(|clause| clause.is_satisfied_by(|var| assignment.value(var)))
            .count();

        ClauseReport {
            satisfied,
            unsatisfied: model.clauses().len() - satisfied,
        }
    }
}
