//! Unified error types for the SRT ecosystem
//!
//! This module provides a common error type [`SrtError`] that can represent
//! errors from any part of the system. Domain-specific failures (model
//! validation, LP solving, file parsing) convert to `SrtError` for uniform
//! handling at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use srt_core::{SrtError, SrtResult};
//!
//! fn route(path: &str) -> SrtResult<()> {
//!     let graph = load_instance(path)?;
//!     solve(&graph)?;
//!     Ok(())
//! }
//! ```

use crate::LinkId;
use thiserror::Error;

/// Unified error type for all SRT operations.
#[derive(Error, Debug)]
pub enum SrtError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input validation errors (malformed incidence matrix, bad parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A correlation coefficient required by the covariance computation was
    /// never set. Defaulting it silently would corrupt the risk term, so this
    /// is always surfaced.
    #[error("missing correlation between link {a} and link {b}", a = .a.value(), b = .b.value())]
    MissingCorrelation { a: LinkId, b: LinkId },

    /// The LP oracle reported the relaxation infeasible. For the bisection
    /// solver the last known bounds on the variance term are attached.
    #[error("no feasible path: LP infeasible (bounds lb={lb:?}, ub={ub:?})")]
    Infeasible { lb: Option<f64>, ub: Option<f64> },

    /// LP oracle failures other than infeasibility
    #[error("Solver error: {0}")]
    Solver(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using SrtError.
pub type SrtResult<T> = Result<T, SrtError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for SrtError {
    fn from(err: anyhow::Error) -> Self {
        SrtError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for SrtError {
    fn from(s: String) -> Self {
        SrtError::Other(s)
    }
}

impl From<&str> for SrtError {
    fn from(s: &str) -> Self {
        SrtError::Other(s.to_string())
    }
}
