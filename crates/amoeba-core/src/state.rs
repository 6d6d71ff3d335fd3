//! Per-unit dynamical state and the convergence predicate.

use amoeba_base::{Error, Result, UnitId};
use crate::rules::RuleSet;

/// Lower clamp of the activation accumulator.
pub const X_MIN: i8 = -1;
/// Upper clamp of the activation accumulator; a unit at `X_MAX` is active.
pub const X_MAX: i8 = 1;

/// The state of every unit, stored in flat arrays indexed by [`UnitId`].
///
/// - `x`: stepped activation in `[-1, 1]`
/// - `y`: whether resource is supplied this step
/// - `z`: noise value of this step
/// - `l`: whether the unit is inhibited
#[derive(Debug, Clone)]
pub struct UnitState {
    x: Vec<i8>,
    y: Vec<bool>,
    z: Vec<f64>,
    l: Vec<bool>,
}

impl UnitState {
    /// Creates the zeroed state for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        let units = 2 * num_vars;
        Self {
            x: vec![0; units],
            y: vec![false; units],
            z: vec![0.0; units],
            l: vec![false; units],
        }
    }

    /// Returns the number of units.
    #[must_use]
    pub fn num_units(&self) -> usize {
        self.x.len()
    }

    /// Returns the activation of a unit.
    #[must_use]
    pub fn x(&self, unit: UnitId) -> i8 {
        self.x[unit.index()]
    }

    /// Returns whether a unit was supplied in the last step.
    #[must_use]
    pub fn y(&self, unit: UnitId) -> bool {
        self.y[unit.index()]
    }

    /// Returns the noise value of a unit in the last step.
    #[must_use]
    pub fn z(&self, unit: UnitId) -> f64 {
        self.z[unit.index()]
    }

    /// Returns whether a unit is inhibited.
    #[must_use]
    pub fn l(&self, unit: UnitId) -> bool {
        self.l[unit.index()]
    }

    /// Returns whether a unit is fully active (`X = 1`).
    #[must_use]
    pub fn is_active(&self, unit: UnitId) -> bool {
        self.x[unit.index()] == X_MAX
    }

    /// Returns all activations.
    #[must_use]
    pub fn activations(&self) -> &[i8] {
        &self.x
    }

    /// Returns all inhibition flags.
    #[must_use]
    pub fn inhibitions(&self) -> &[bool] {
        &self.l
    }

    /// Returns all noise values.
    #[must_use]
    pub fn noise(&self) -> &[f64] {
        &self.z
    }

    pub(crate) fn noise_mut(&mut self) -> &mut [f64] {
        &mut self.z
    }

    /// Supply step: `Y = 1` iff `1 - eta - Z > 0` and the unit is not
    /// inhibited. Returns the number of supplied units.
    pub fn update_supply(&mut self, eta: f64) -> usize {
        let mut supplied = 0;
        for ((y, &z), &l) in self.y.iter_mut().zip(&self.z).zip(&self.l) {
            *y = 1.0 - eta - z > 0.0 && !l;
            supplied += usize::from(*y);
        }
        supplied
    }

    /// Activation step: supplied units grow, the others bounce back, both
    /// clamped to `[X_MIN, X_MAX]`.
    pub fn update_activation(&mut self) {
        for (x, &y) in self.x.iter_mut().zip(&self.y) {
            if y && *x < X_MAX {
                *x += 1;
            } else if !y && *x > X_MIN {
                *x -= 1;
            }
            debug_assert!((X_MIN..=X_MAX).contains(x));
        }
    }

    /// Inhibition step: clears every flag, then applies INTRA, INTER and
    /// CONTRA in turn against the current activations. Rules only ever set
    /// flags, so the result does not depend on rule order. Returns the number
    /// of inhibited units.
    pub fn update_inhibition(&mut self, rules: &RuleSet) -> usize {
        self.l.fill(false);
        let active = |u: &UnitId| self.x[u.index()] == X_MAX;
        let l = &mut self.l;

        for rule in &rules.intra {
            if active(&rule.source) {
                l[rule.target.index()] = true;
            }
        }

        for rule in &rules.inter {
            if rule.premise.iter().all(active) {
                l[rule.target.index()] = true;
            }
        }

        for rule in &rules.contra {
            if rule.units.iter().all(active) {
                for unit in &rule.units {
                    l[unit.index()] = true;
                }
            }
        }

        l.iter().filter(|&&flag| flag).count()
    }

    /// Verifies that every activation lies within `[X_MIN, X_MAX]`.
    pub fn check_invariants(&self) -> Result<()> {
        match self
            .x
            .iter()
            .position(|x| !(X_MIN..=X_MAX).contains(x))
        {
            Some(idx) => Err(Error::InvariantViolation(format!(
                "unit {} has activation {} outside [{X_MIN}, {X_MAX}]",
                UnitId::from_index(idx),
                self.x[idx]
            ))),
            None => Ok(()),
        }
    }
}

/// Returns whether the population sits at a fixed point.
///
/// Holds iff every unit is either active and uninhibited or inactive
/// (`X <= 0`) and inhibited. A single violating unit fails the check.
#[must_use]
pub fn is_converged(state: &UnitState) -> bool {
    state
        .x
        .iter()
        .zip(&state.l)
        .all(|(&x, &l)| (x == X_MAX && !l) || (x <= 0 && l))
}
