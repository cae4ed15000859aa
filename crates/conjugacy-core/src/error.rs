//! Error taxonomy.
//!
//! The engine only fails with [`ConjugacyError`]. Reading observations and
//! writing results have their own error types, and [`Error`] wraps all three
//! for callers that drive the whole pipeline.

use std::path::PathBuf;

/// Which column of an observation a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Failures of the statistic engine itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConjugacyError {
    /// Fewer observations than the method needs (p = floor(N/3) would be 0).
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// NaN or infinite value; `row` is the 0-based input position.
    #[error("non-finite {axis} value at row {row}")]
    NonFinite { row: usize, axis: Axis },
}

/// Failures of the input collaborator (text columns → observations).
#[derive(Debug, thiserror::Error)]
pub enum InputFormatError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank line did not split into exactly two fields. Lines are 1-based.
    #[error("line {line}: expected 2 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("line {line}, column {column}: '{token}' is not a number")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("column length mismatch: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },
}

/// Failures of the output collaborator.
#[derive(Debug, thiserror::Error)]
pub enum OutputWriteError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Any failure along the read → compute → write pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputFormatError),

    #[error(transparent)]
    Compute(#[from] ConjugacyError),

    #[error(transparent)]
    Output(#[from] OutputWriteError),

    /// Evaluation of this dataset panicked; nothing was computed for it.
    #[error("evaluation aborted: {0}")]
    Aborted(String),
}

impl Error {
    /// True when the dataset was readable but too small for the method.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Error::Compute(ConjugacyError::InsufficientData { .. })
        )
    }
}
