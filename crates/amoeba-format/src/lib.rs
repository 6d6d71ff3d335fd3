//! # amoeba-format
//!
//! Problem file parsing for amoeba.
//!
//! Supports:
//! - **DIMACS CNF**: the SAT competition format, including the `%` trailer
//!   used by the SATLIB uniform random 3-SAT benchmarks

pub mod dimacs;

pub use dimacs::{DimacsCnf, LoadOptions};
