//! Assignment extraction from unit activations.

use amoeba_base::{UnitId, Var};
use serde::Serialize;
use std::fmt;
use crate::state::{UnitState, X_MAX};

/// The boolean value of every variable as read from the units.
///
/// A variable is read as 1 when its true-unit is active and its false-unit is
/// not (`X <= 0`), and as 0 in the mirrored case. In any other configuration
/// the previous value is kept and the variable is marked undetermined for the
/// step. Values start at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    values: Vec<bool>,
    determined: Vec<bool>,
}

impl Assignment {
    /// Creates the all-zero, all-undetermined assignment.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            values: vec![false; num_vars],
            determined: vec![false; num_vars],
        }
    }

    /// Re-reads every variable from the current activations.
    pub fn update(&mut self, state: &UnitState) {
        for (idx, (value, determined)) in
            self.values.iter_mut().zip(self.determined.iter_mut()).enumerate()
        {
            let var = Var::from_index(idx);
            let t = state.x(UnitId::true_unit(var));
            let f = state.x(UnitId::false_unit(var));

            if t <= 0 && f == X_MAX {
                *value = false;
                *determined = true;
            } else if t == X_MAX && f <= 0 {
                *value = true;
                *determined = true;
            } else {
                *determined = false;
            }
        }
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value of a variable.
    #[must_use]
    pub fn value(&self, var: Var) -> bool {
        self.values[var.index()]
    }

    /// Returns all values, indexed by `var - 1`.
    #[must_use]
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Returns whether the last update read `var` unambiguously.
    #[must_use]
    pub fn is_determined(&self, var: Var) -> bool {
        self.determined[var.index()]
    }

    /// Iterates over variables whose value is stale from an earlier step.
    pub fn undetermined(&self) -> impl Iterator<Item = Var> + '_ {
        self.determined
            .iter()
            .enumerate()
            .filter(|&(_, &d)| !d)
            .map(|(idx, _)| Var::from_index(idx))
    }

    /// Returns the assignment as DIMACS literals (`v` or `-v`).
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<i64> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let lit = (i + 1) as i64;
                if v { lit } else { -lit }
            })
            .collect()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &val) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "x{} = {}", i + 1, u8::from(val))?;
        }
        write!(f, "]")
    }
}
