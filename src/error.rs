//! Error type shared by the aggregation and contact-matrix operations.

use thiserror::Error;

/// Result alias for the pure transforms in this crate.
pub type Result<T> = std::result::Result<T, MixingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixingError {
    /// Input for which the operation has no defined value (zero cohort size,
    /// population of one or less, non-positive spectral radius).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Re-aggregation was asked to go from coarse brackets to finer ones.
    #[error("cannot convert {larger} brackets into {smaller}: only coarsening is supported")]
    UnsupportedDirection { larger: usize, smaller: usize },

    #[error("shape mismatch: expected {expected}x{expected}, found {found}")]
    ShapeMismatch { expected: usize, found: String },

    #[error("matrix must be square: {rows} rows but row {row} has {len} columns")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("matrix is empty")]
    EmptyMatrix,

    #[error("missing {what}: {key}")]
    MissingKey { what: &'static str, key: String },

    #[error("bracket schemes are not aligned: {0}")]
    StructuralMismatch(String),

    #[error("age {age} appears in bracket {first} and bracket {second}")]
    BracketOverlap { age: usize, first: usize, second: usize },

    #[error("age {age} is not covered by any bracket")]
    BracketGap { age: usize },

    #[error("bracket {0} contains no ages")]
    EmptyBracket(usize),
}

impl MixingError {
    pub(crate) fn missing(what: &'static str, key: impl ToString) -> Self {
        Self::MissingKey { what, key: key.to_string() }
    }
}
