//! # Report Module
//!
//! Assembly and text rendering of the exploratory report.
//!
//! The report is plain data: it is built once from a [`Dataset`], serialized
//! as JSON by the app when asked, or rendered to text block by block. Block
//! order follows the order the analysis is read in: table summaries, head
//! previews, cardinality, most-rated, rating distribution, top by average,
//! user activity, genre counts.

use crate::aggregate::{
    self, Cardinality, GenreCount, MovieAverage, MovieCount, ScoreBucket, UserActivity,
};
use crate::{AnalysisConfig, Dataset, TableProfile};
use serde::{Deserialize, Serialize};

/// The complete exploratory report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdaReport {
    pub movies: TableProfile,
    pub ratings: TableProfile,
    pub cardinality: Cardinality,
    pub most_rated: Vec<MovieCount>,
    pub rating_distribution: Vec<ScoreBucket>,
    pub top_by_average: Vec<MovieAverage>,
    pub user_activity: Vec<UserActivity>,
    pub genre_counts: Vec<GenreCount>,
}

impl EdaReport {
    /// Compute every aggregate over the dataset.
    #[must_use]
    pub fn build(dataset: &Dataset, config: &AnalysisConfig) -> Self {
        let report = Self {
            movies: dataset.movie_profile().clone(),
            ratings: dataset.rating_profile().clone(),
            cardinality: aggregate::cardinality(dataset.ratings()),
            most_rated: aggregate::most_rated(dataset, config.top_n),
            rating_distribution: aggregate::rating_distribution(dataset.ratings()),
            top_by_average: aggregate::top_by_average(dataset, config.top_n),
            user_activity: aggregate::user_activity(dataset.ratings()),
            genre_counts: aggregate::genre_counts(dataset.movies(), config.genre_separator),
        };
        tracing::info!(
            users = report.cardinality.unique_users,
            movies = report.cardinality.unique_movies,
            genres = report.genre_counts.len(),
            "Report built"
        );
        report
    }

    /// Render all blocks as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let blocks = [
            self.movies.summary_text(),
            self.ratings.summary_text(),
            self.movies.head_text(),
            self.ratings.head_text(),
            cardinality_text(&self.cardinality),
            most_rated_text(&self.most_rated),
            distribution_text(&self.rating_distribution),
            top_by_average_text(&self.top_by_average),
            user_activity_text(&self.user_activity),
            genre_counts_text(&self.genre_counts),
        ];
        blocks.join("\n")
    }
}

// =============================================================================
// TEXT BLOCKS
// =============================================================================

/// Distinct users, distinct movies and total ratings.
#[must_use]
pub fn cardinality_text(cardinality: &Cardinality) -> String {
    format!(
        "Unique Users: {}\nUnique Movies Rated: {}\nTotal Ratings: {}\n",
        cardinality.unique_users, cardinality.unique_movies, cardinality.total_ratings
    )
}

#[must_use]
pub fn most_rated_text(rows: &[MovieCount]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.title.clone(), r.rating_count.to_string()])
        .collect();
    format!(
        "Top Rated Movies:\n{}",
        table(&["title", "rating_count"], &body)
    )
}

#[must_use]
pub fn distribution_text(rows: &[ScoreBucket]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|b| vec![b.rating.to_string(), b.count.to_string()])
        .collect();
    format!("Rating Distribution:\n{}", table(&["rating", "count"], &body))
}

#[must_use]
pub fn top_by_average_text(rows: &[MovieAverage]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.title.clone(),
                format!("{:.6}", r.mean_rating),
                r.rating_count.to_string(),
            ]
        })
        .collect();
    format!(
        "Top Movies by Average Rating:\n{}",
        table(&["title", "rating", "rating_count"], &body)
    )
}

#[must_use]
pub fn user_activity_text(rows: &[UserActivity]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.user_id.to_string(), r.num_ratings.to_string()])
        .collect();
    format!(
        "User Activity:\n{}[{} rows x 2 columns]\n",
        table(&["userId", "num_ratings"], &body),
        rows.len()
    )
}

#[must_use]
pub fn genre_counts_text(rows: &[GenreCount]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|g| vec![g.genre.clone(), g.movie_count.to_string()])
        .collect();
    format!(
        "Number of Movies per Genre:\n{}",
        table(&["genre", "movie_count"], &body)
    )
}

/// Right-aligned table with a row index column.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let index_width = rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
        })
        .collect();

    let mut output = " ".repeat(index_width);
    for (name, width) in headers.iter().zip(&widths) {
        output.push_str(&format!("  {:>width$}", name, width = *width));
    }
    output.push('\n');

    if rows.is_empty() {
        output.push_str("(empty)\n");
        return output;
    }
    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format!("{:<index_width$}", i));
        for (col, width) in widths.iter().enumerate() {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            output.push_str(&format!("  {:>width$}", cell, width = *width));
        }
        output.push('\n');
    }
    output
}

// =============================================================================
// TESTS
// =============================================================================
