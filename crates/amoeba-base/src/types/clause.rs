//! Clauses and the read-only clause model.

use serde::{Deserialize, Serialize};
use super::literal::Literal;
use super::unit::Var;
use crate::error::{Error, Result};

/// An ordered disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a clause from literals.
    #[must_use]
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Creates a clause from DIMACS literals.
    pub fn from_dimacs(literals: &[i64]) -> Result<Self> {
        literals
            .iter()
            .map(|&l| Literal::from_dimacs(l))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Returns the literals in clause order.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns the number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Returns whether the clause has no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Evaluates the clause under a per-variable assignment lookup.
    pub fn is_satisfied_by(&self, value_of: impl Fn(Var) -> bool) -> bool {
        self.literals
            .iter()
            .any(|lit| lit.is_satisfied_by(value_of(lit.var)))
    }
}

/// A validated problem instance: clauses plus the declared variable count.
///
/// Built once per instance and only ever read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseModel {
    num_vars: usize,
    clauses: Vec<Clause>,
}

impl ClauseModel {
    /// Creates a clause model, checking the preconditions of the core.
    ///
    /// Requires at least one variable, at least one clause, no empty clause and
    /// every literal's variable within `1..=num_vars`.
    pub fn new(num_vars: usize, clauses: Vec<Clause>) -> Result<Self> {
        if num_vars == 0 {
            return Err(Error::Precondition("variable count must be at least 1".to_string()));
        }
        if clauses.is_empty() {
            return Err(Error::Precondition("clause set is empty".to_string()));
        }
        for (i, clause) in clauses.iter().enumerate() {
            if clause.is_empty() {
                return Err(Error::Precondition(format!("clause {i} is empty")));
            }
            if let Some(lit) = clause
                .literals()
                .iter()
                .find(|lit| lit.var.id() as usize > num_vars)
            {
                return Err(Error::Precondition(format!(
                    "clause {i} references variable {} but only {num_vars} are declared",
                    lit.var
                )));
            }
        }
        Ok(Self { num_vars, clauses })
    }

    /// Creates a clause model from DIMACS literal lists.
    pub fn from_dimacs(num_vars: usize, clauses: &[Vec<i64>]) -> Result<Self> {
        let clauses = clauses
            .iter()
            .map(|c| Clause::from_dimacs(c))
            .collect::<Result<Vec<_>>>()?;
        Self::new(num_vars, clauses)
    }

    /// Returns the declared variable count.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the number of units (two per variable).
    #[must_use]
    pub fn num_units(&self) -> usize {
        2 * self.num_vars
    }

    /// Returns the clauses.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Iterates over all variables in id order.
    pub fn vars(&self) -> impl Iterator<Item = Var> {
        (0..self.num_vars).map(Var::from_index)
    }
}
