//! Signed variable references.

use serde::{Deserialize, Serialize};
use super::unit::{Polarity, UnitId, Var};
use crate::error::{Error, Result};

/// A literal is a variable with optional negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The underlying variable.
    pub var: Var,
    /// Whether this literal is negated.
    pub negated: bool,
}

impl Literal {
    /// Creates a positive literal.
    #[must_use]
    pub const fn pos(var: Var) -> Self {
        Self { var, negated: false }
    }

    /// Creates a negated literal.
    #[must_use]
    pub const fn neg(var: Var) -> Self {
        Self { var, negated: true }
    }

    /// Parses a DIMACS literal (sign = polarity, magnitude = variable id).
    pub fn from_dimacs(lit: i64) -> Result<Self> {
        let id = u32::try_from(lit.unsigned_abs()).map_err(|_| Error::InvalidLiteral(lit))?;
        let var = Var::new(id).ok_or(Error::InvalidLiteral(lit))?;
        Ok(Self { var, negated: lit < 0 })
    }

    /// Converts back to DIMACS form.
    #[must_use]
    pub fn to_dimacs(&self) -> i64 {
        let base = i64::from(self.var.id());
        if self.negated { -base } else { base }
    }

    /// Returns the unit whose activity makes this literal false.
    ///
    /// For `v` that is the false-unit of `v`; for `-v` it is the true-unit.
    #[must_use]
    pub const fn falsifying_unit(&self) -> UnitId {
        let polarity = if self.negated { Polarity::True } else { Polarity::False };
        UnitId::new(self.var, polarity)
    }

    /// Evaluates the literal under a value for its variable.
    #[must_use]
    pub const fn is_satisfied_by(&self, value: bool) -> bool {
        value != self.negated
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }
}
