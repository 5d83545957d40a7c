//! Solver error taxonomy
//!
//! Every failure is fatal to the current solve call. Nothing here is retried
//! internally: identical inputs would fail identically.

use thiserror::Error;

/// Rejected inputs, detected before any integration work starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("chain must contain at least one bob")]
    EmptyChain,

    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("bob {index} has non-positive length {value}")]
    NonPositiveLength { index: usize, value: f64 },

    #[error("bob {index} has non-positive mass {value}")]
    NonPositiveMass { index: usize, value: f64 },

    #[error("duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    #[error("frame count must be at least 1")]
    ZeroFrameCount,

    #[error("{what}[{index}] is not finite")]
    NonFiniteValue { what: &'static str, index: usize },

    #[error("invalid integrator tolerance: {0}")]
    InvalidTolerance(String),

    #[error("invalid parameter range: {0}")]
    InvalidRange(String),

    #[error("sample times must be increasing and lie within [0, {t_end}]")]
    BadSampleTimes { t_end: f64 },
}

/// Errors surfaced by a solve call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("numerical failure at t={time:.6}: {reason}")]
    NumericalFailure { time: f64, reason: String },

    #[error("integrator failed to converge at t={time:.6} (step {step:e})")]
    NonConvergence { time: f64, step: f64 },
}

impl SolveError {
    pub(crate) fn numerical(time: f64, reason: impl Into<String>) -> Self {
        SolveError::NumericalFailure {
            time,
            reason: reason.into(),
        }
    }

    /// True when the inputs themselves were rejected
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SolveError::InvalidInput(_))
    }
}

pub type SolveResult<T> = Result<T, SolveError>;
