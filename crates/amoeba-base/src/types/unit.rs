//! Variables and their units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A problem variable, numbered from 1 as in DIMACS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Var(u32);

impl Var {
    /// Creates a variable, rejecting id 0.
    #[must_use]
    pub const fn new(id: u32) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Returns the 1-based id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based position used by flat per-variable arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the variable stored at a 0-based position.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a variable's two units is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// The unit whose activity votes for `x = 0`.
    False = 0,
    /// The unit whose activity votes for `x = 1`.
    True = 1,
}

impl Polarity {
    /// Returns the opposite polarity.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::False => Self::True,
            Self::True => Self::False,
        }
    }
}

/// A unit, stored as the flat index `2 * (var - 1) + polarity`.
///
/// Every variable owns exactly two units, so a population of `n` variables
/// lives in arrays of length `2n` with a variable's units side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates the unit of `var` with the given polarity.
    #[must_use]
    pub const fn new(var: Var, polarity: Polarity) -> Self {
        Self(2 * (var.0 - 1) + polarity as u32)
    }

    /// The unit voting for `var = 1`.
    #[must_use]
    pub const fn true_unit(var: Var) -> Self {
        Self::new(var, Polarity::True)
    }

    /// The unit voting for `var = 0`.
    #[must_use]
    pub const fn false_unit(var: Var) -> Self {
        Self::new(var, Polarity::False)
    }

    /// Returns the unit stored at a flat index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the flat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the owning variable.
    #[must_use]
    pub const fn var(self) -> Var {
        Var(self.0 / 2 + 1)
    }

    /// Returns the polarity.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        if self.0 & 1 == 1 {
            Polarity::True
        } else {
            Polarity::False
        }
    }

    /// Returns the other unit of the same variable.
    #[must_use]
    pub const fn sibling(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = match self.polarity() {
            Polarity::True => 1,
            Polarity::False => 0,
        };
        write!(f, "{}{}", self.var(), bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: u32) -> Var {
        Var::new(id).unwrap()
    }

    #[test]
    fn test_var_rejects_zero() {
        assert!(Var::new(0).is_none());
        assert_eq!(var(7).index(), 6);
        assert_eq!(Var::from_index(6), var(7));
    }

    #[test]
    fn test_unit_layout() {
        assert_eq!(UnitId::false_unit(var(1)).index(), 0);
        assert_eq!(UnitId::true_unit(var(1)).index(), 1);
        assert_eq!(UnitId::false_unit(var(3)).index(), 4);
        assert_eq!(UnitId::true_unit(var(3)).index(), 5);
    }

    #[test]
    fn test_unit_accessors() {
        let t = UnitId::true_unit(var(4));
        assert_eq!(t.var(), var(4));
        assert_eq!(t.polarity(), Polarity::True);
        assert_eq!(t.sibling(), UnitId::false_unit(var(4)));
        assert_eq!(t.sibling().sibling(), t);
        assert_eq!(t.to_string(), "41");
        assert_eq!(t.sibling().to_string(), "40");
    }

    #[test]
    fn test_polarity_flip() {
        assert_eq!(Polarity::True.flip(), Polarity::False);
        assert_eq!(Polarity::False.flip(), Polarity::True);
    }
}
