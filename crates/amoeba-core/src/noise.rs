//! Noise sources driving resource supply.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two stimulation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Fresh uniform draws for every unit on every iteration.
    #[default]
    Brownian,
    /// Uniform draws on the first iteration, then the logistic map at r = 4.
    Logistic,
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brownian => write!(f, "brownian"),
            Self::Logistic => write!(f, "logistic"),
        }
    }
}

impl FromStr for NoiseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brownian" => Ok(Self::Brownian),
            "logistic" => Ok(Self::Logistic),
            other => Err(format!("unknown noise kind: {other}")),
        }
    }
}

/// Produces the Z value of every unit, once per iteration.
///
/// Each source owns its RNG, so independent runs never share a stream.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    kind: NoiseKind,
    rng: StdRng,
}

impl NoiseSource {
    /// Creates a reproducible source.
    #[must_use]
    pub fn seeded(kind: NoiseKind, seed: u64) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy(kind: NoiseKind) -> Self {
        Self {
            kind,
            rng: StdRng::from_entropy(),
        }
    }

    /// Returns the strategy.
    #[must_use]
    pub fn kind(&self) -> NoiseKind {
        self.kind
    }

    /// Overwrites `z` with the values for the 1-based `iteration`.
    ///
    /// The logistic map iterates on the previous contents of `z`, so the same
    /// slice must be passed on every call of a run.
    pub fn fill(&mut self, iteration: u64, z: &mut [f64]) {
        match self.kind {
            NoiseKind::Brownian => self.draw(z),
            NoiseKind::Logistic if iteration <= 1 => self.draw(z),
            NoiseKind::Logistic => {
                for v in z.iter_mut() {
                    *v = 4.0 * *v * (1.0 - *v);
                }
            }
        }
    }

    fn draw(&mut self, z: &mut [f64]) {
        for v in z.iter_mut() {
            *v = self.rng.gen::<f64>();
        }
    }
}
