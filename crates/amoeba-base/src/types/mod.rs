//! Type system for amoeba problems.
//!
//! Hierarchy:
//! - `Var` → 1-based problem variable
//! - `UnitId` → one of the two units (true-unit, false-unit) a variable owns
//! - `Literal` → signed variable reference
//! - `Clause` → ordered literal list
//! - `ClauseModel` → validated, read-only problem instance

mod clause;
mod literal;
mod unit;

pub use clause::{Clause, ClauseModel};
pub use literal::Literal;
pub use unit::{Polarity, UnitId, Var};
