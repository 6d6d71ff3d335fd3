//! # amoeba-base
//!
//! Core types and utilities shared by the amoeba crates.
//!
//! This crate provides the foundational building blocks used across the
//! workspace, including:
//!
//! - **Type System**: variables, the two units each variable owns, literals,
//!   clauses and the read-only clause model
//! - **Error Types**: unified error handling across the solver

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Clause, ClauseModel, Literal, Polarity, UnitId, Var};
