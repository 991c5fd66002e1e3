//! Error types for the analysis pipeline

use thiserror::Error;

/// Errors surfaced by the analysis core and the table reader
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Rejected before any computation starts
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The rational baseline fit did not produce a usable model
    #[error("Rational fit diverged after {iterations} iterations: {reason}")]
    FitDivergence { iterations: usize, reason: String },

    /// A baseline was not aligned with the series it should detrend
    #[error("Length mismatch: series has {expected} samples, baseline has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An input table row could not be decoded; `line` is 1-based
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reading the input table or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
