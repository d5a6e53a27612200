//! CSV decoding for the movie and rating tables.

use crate::profile::{Profiler, TableProfile};
use crate::{AnalysisConfig, Dataset, Error, Movie, Rating, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Columns that must be present in the movie table header.
pub const MOVIE_COLUMNS: [&str; 3] = ["movieId", "title", "genres"];

/// Columns that must be present in the rating table header.
pub const RATING_COLUMNS: [&str; 3] = ["userId", "movieId", "rating"];

/// Decode the movie table and profile its columns.
pub fn read_movies<R: Read>(reader: R, head_rows: usize) -> Result<(Vec<Movie>, TableProfile)> {
    read_table("movies", &MOVIE_COLUMNS, reader, head_rows)
}

/// Decode the rating table and profile its columns.
pub fn read_ratings<R: Read>(reader: R, head_rows: usize) -> Result<(Vec<Rating>, TableProfile)> {
    read_table("ratings", &RATING_COLUMNS, reader, head_rows)
}

/// Decode both tables and assemble a validated [`Dataset`].
pub fn load_dataset<M: Read, R: Read>(
    movies: M,
    ratings: R,
    config: &AnalysisConfig,
) -> Result<Dataset> {
    let (movie_rows, movie_profile) = read_movies(movies, config.head_rows)?;
    let (rating_rows, rating_profile) = read_ratings(ratings, config.head_rows)?;
    tracing::info!(
        movies = movie_rows.len(),
        ratings = rating_rows.len(),
        "Decoded dataset"
    );
    Dataset::with_profiles(movie_rows, rating_rows, movie_profile, rating_profile)
}

fn read_table<T, R>(
    table: &'static str,
    required: &[&'static str],
    reader: R,
    head_rows: usize,
) -> Result<(Vec<T>, TableProfile)>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn { table, column });
        }
    }

    let mut profiler = Profiler::new(table, &headers, head_rows);
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        profiler.observe(&record);
        rows.push(record.deserialize(Some(&headers))?);
    }

    let profile = profiler.finish();
    if profile.row_count == 0 {
        tracing::warn!(table, "Table has a header but no rows");
    }
    Ok((rows, profile))
}

// =============================================================================
// TESTS
// =============================================================================
