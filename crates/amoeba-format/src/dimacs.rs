//! DIMACS CNF format parser.
//!
//! Standard format used in SAT competitions. Lines starting with `c` or `%`
//! are comments, the `p` line declares the variable count in its third token
//! and every clause is terminated by a `0` token.

use amoeba_base::{ClauseModel, Error, Result};
use std::io::{BufRead, BufReader, Read};

/// Clause length below which clauses are dropped by default.
///
/// The heuristic was built for 3-CNF instances; 1- and 2-literal clauses are
/// discarded unless the caller lowers the threshold.
pub const DEFAULT_MIN_CLAUSE_LEN: usize = 3;

/// Options controlling how clauses are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Clauses with fewer literals than this are dropped.
    pub min_clause_len: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            min_clause_len: DEFAULT_MIN_CLAUSE_LEN,
        }
    }
}

impl LoadOptions {
    /// Keeps every non-empty clause (general CNF).
    #[must_use]
    pub const fn general_cnf() -> Self {
        Self { min_clause_len: 1 }
    }
}

/// A DIMACS CNF formula.
#[derive(Debug, Clone)]
pub struct DimacsCnf {
    /// Number of variables.
    pub num_vars: usize,
    /// Retained clauses as vectors of literals.
    pub clauses: Vec<Vec<i64>>,
    /// Number of clauses discarded for being too short.
    pub dropped_clauses: usize,
}

impl DimacsCnf {
    /// Parses DIMACS CNF from a reader with default options.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, LoadOptions::default())
    }

    /// Parses DIMACS CNF from a reader.
    pub fn from_reader_with<R: Read>(reader: R, options: LoadOptions) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut num_vars = None;
        let mut clauses = Vec::new();
        let mut dropped_clauses = 0;
        let mut keep = |clause: Vec<i64>, clauses: &mut Vec<Vec<i64>>| {
            if clause.len() >= options.min_clause_len {
                clauses.push(clause);
            } else {
                tracing::debug!(?clause, "dropping short clause");
                dropped_clauses += 1;
            }
        };

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
                continue;
            }

            // Parse header
            if line.starts_with('p') {
                let token = line.split_whitespace().nth(2).ok_or_else(|| Error::Parse {
                    line: line_no,
                    message: "header is missing the variable count".to_string(),
                })?;
                let count = token.parse().map_err(|e| Error::Parse {
                    line: line_no,
                    message: format!("Invalid variable count {token:?}: {e}"),
                })?;
                num_vars = Some(count);
                continue;
            }

            if num_vars.is_none() {
                return Err(Error::Parse {
                    line: line_no,
                    message: "clause before DIMACS header 'p cnf ...'".to_string(),
                });
            }

            // Parse clause
            let mut clause = Vec::new();
            for token in line.split_whitespace() {
                let lit: i64 = token.parse().map_err(|e| Error::Parse {
                    line: line_no,
                    message: format!("Invalid literal {token:?}: {e}"),
                })?;
                if lit == 0 {
                    if !clause.is_empty() {
                        keep(std::mem::take(&mut clause), &mut clauses);
                    }
                } else {
                    clause.push(lit);
                }
            }
            // Handle clauses not terminated by 0
            if !clause.is_empty() {
                keep(clause, &mut clauses);
            }
        }

        let num_vars = num_vars.ok_or_else(|| Error::Parse {
            line: 0,
            message: "DIMACS header 'p cnf ...' not found".to_string(),
        })?;

        Ok(Self {
            num_vars,
            clauses,
            dropped_clauses,
        })
    }

    /// Parses DIMACS CNF from a string with default options.
    pub fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parses DIMACS CNF from a string.
    pub fn from_str_with(s: &str, options: LoadOptions) -> Result<Self> {
        Self::from_reader_with(s.as_bytes(), options)
    }

    /// Converts to DIMACS string.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("p cnf {} {}\n", self.num_vars, self.clauses.len()));
        for clause in &self.clauses {
            for lit in clause {
                out.push_str(&format!("{lit} "));
            }
            out.push_str("0\n");
        }
        out
    }

    /// Converts to the validated model consumed by the solver core.
    pub fn to_clause_model(&self) -> Result<ClauseModel> {
        ClauseModel::from_dimacs(self.num_vars, &self.clauses)
    }
}
