//! # Cinelens Core
//!
//! Deterministic analysis engine for a movie-ratings dataset.
//!
//! The crate decodes two tables (movies and ratings) from CSV, profiles their
//! columns while decoding, and computes the descriptive aggregates that make
//! up an exploratory report:
//!
//! - table summary and head preview ([`profile`])
//! - distinct user/movie counts, most-rated movies, rating distribution,
//!   highest average rating, per-user activity and genre counts ([`aggregate`])
//! - the assembled, serializable report ([`report`])
//!
//! File I/O, printing and chart rendering live in the `cinelens` app crate.
//! Everything here is pure and works on any `io::Read`.

pub mod aggregate;
pub mod dataset;
pub mod formats;
pub mod profile;
pub mod report;

mod error;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use profile::{ColumnKind, ColumnProfile, TableProfile};
pub use report::EdaReport;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Default number of rows in a head preview.
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Default length of the "top N" lists.
pub const DEFAULT_TOP_N: usize = 5;

/// Separator between genre tags in the `genres` column.
pub const DEFAULT_GENRE_SEPARATOR: char = '|';

/// Knobs shared by the loaders and the report builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Length of the most-rated and top-average lists.
    pub top_n: usize,
    /// Number of raw rows kept for the head preview.
    pub head_rows: usize,
    /// Separator between genre tags.
    pub genre_separator: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            head_rows: DEFAULT_HEAD_ROWS,
            genre_separator: DEFAULT_GENRE_SEPARATOR,
        }
    }
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a movie (`movieId` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

/// Identifier of a user (`userId` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SCORE
// =============================================================================

/// A rating value.
///
/// Always finite, with `-0.0` folded into `0.0`, so the type can be totally
/// ordered and used as a `BTreeMap` key for the rating distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// Create a score, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidScore(value));
        }
        // 0.0 == -0.0, this keeps a single representation for the key.
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(Self(value))
    }

    /// The underlying value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 4 -> "4.0", 3.5 -> "3.5"
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A row of the movie table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-delimited genre tags; `None` when the field is empty.
    pub genres: Option<String>,
}

impl Movie {
    /// Create a new movie row.
    pub fn new(movie_id: MovieId, title: impl Into<String>, genres: impl Into<String>) -> Self {
        let genres = genres.into();
        Self {
            movie_id,
            title: title.into(),
            genres: if genres.is_empty() { None } else { Some(genres) },
        }
    }

    /// Distinct, trimmed, non-empty genre tags in first-seen order.
    pub fn genre_tags(&self, separator: char) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        let Some(genres) = self.genres.as_deref() else {
            return tags;
        };
        // Trimmed on purpose: " Comedy" and "Comedy" are the same genre.
        for tag in genres.split(separator).map(str::trim) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

/// A row of the rating table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: Score,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Rating {
    /// Create a new rating row without a timestamp.
    pub fn new(user_id: UserId, movie_id: MovieId, rating: Score) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
