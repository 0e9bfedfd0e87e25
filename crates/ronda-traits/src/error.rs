//! Error types for the ronda screener.
//!
//! Only structural problems are errors here. Sparse data, missing history and
//! empty symbol intersections are ordinary outcomes that degrade to "no
//! candidates" and never surface as a [`RondaError`].

use thiserror::Error;

/// The main error type for ronda operations.
#[derive(Debug, Error)]
pub enum RondaError {
    /// A table violates a shape invariant: unsorted or duplicate timestamps,
    /// duplicate symbols, duplicate (symbol, time) cells or a payload that is
    /// not rectangular.
    #[error("Shape error: {0}")]
    Shape(String),

    /// A named table (or strategy) is not registered.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A table name is already taken in this store.
    #[error("Table already registered: {0}")]
    DuplicateTable(String),

    /// A `dataset:field` address is not part of the table registry.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// An event record's period label cannot be read as a calendar year or quarter.
    #[error("Malformed period label: {0:?}")]
    MalformedPeriod(String),

    /// Error due to invalid or malformed input.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl RondaError {
    /// Whether this error marks a missing input rather than a malformed one.
    ///
    /// The evaluator uses this to tell "strategy could not load" apart from
    /// "strategy is broken" in its logs.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<String> for RondaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for RondaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;
