//! Error types for Cinelens core.

use crate::MovieId;
use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding or validating the dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// The CSV reader or a typed row decode failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// The same movieId appears on two movie rows.
    #[error("duplicate movieId {0} in movies table")]
    DuplicateMovie(MovieId),

    /// A rating value is NaN or infinite.
    #[error("rating value {0} is not a finite number")]
    InvalidScore(f64),
}
