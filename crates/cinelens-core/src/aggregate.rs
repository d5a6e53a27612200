//! # Aggregate Module
//!
//! The grouped summaries of the exploratory report.
//!
//! Every grouping uses `BTreeMap` and every ranking has an explicit tie-break,
//! so two runs over the same input always produce the same rows in the same
//! order.
//!
//! Joins against the movie table behave as inner joins: a rating whose
//! `movieId` has no movie row never appears in a titled result.

use crate::{Dataset, Movie, MovieId, Rating, Score, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RESULT ROWS
// =============================================================================

/// Distinct users, distinct rated movies and total ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    pub unique_users: usize,
    pub unique_movies: usize,
    pub total_ratings: usize,
}

/// A movie with its number of ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCount {
    pub movie_id: MovieId,
    pub title: String,
    pub rating_count: usize,
}

/// Number of ratings carrying one rating value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub rating: Score,
    pub count: usize,
}

/// A movie with its mean rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieAverage {
    pub movie_id: MovieId,
    pub title: String,
    pub mean_rating: f64,
    pub rating_count: usize,
}

/// Number of ratings submitted by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: UserId,
    pub num_ratings: usize,
}

/// Number of movies tagged with one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub movie_count: usize,
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// Count distinct users, distinct movies and rows of the rating table.
pub fn cardinality(ratings: &[Rating]) -> Cardinality {
    let users: BTreeSet<UserId> = ratings.iter().map(|r| r.user_id).collect();
    let movies: BTreeSet<MovieId> = ratings.iter().map(|r| r.movie_id).collect();
    Cardinality {
        unique_users: users.len(),
        unique_movies: movies.len(),
        total_ratings: ratings.len(),
    }
}

/// Number of ratings per movie, ascending by `MovieId`.
pub fn ratings_per_movie(ratings: &[Rating]) -> BTreeMap<MovieId, usize> {
    let mut counts = BTreeMap::new();
    for rating in ratings {
        *counts.entry(rating.movie_id).or_insert(0usize) += 1;
    }
    counts
}

/// The `n` most-rated movies with their titles.
///
/// The top `n` ids are picked by count (descending, ties by ascending id)
/// before joining titles, so ids missing from the movie table shorten the
/// list instead of being replaced.
pub fn most_rated(dataset: &Dataset, n: usize) -> Vec<MovieCount> {
    let mut counts: Vec<(MovieId, usize)> =
        ratings_per_movie(dataset.ratings()).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts.truncate(n);
    let picked = counts.len();

    let joined: Vec<MovieCount> = counts
        .into_iter()
        .filter_map(|(movie_id, rating_count)| {
            dataset.title(movie_id).map(|title| MovieCount {
                movie_id,
                title: title.to_string(),
                rating_count,
            })
        })
        .collect();
    if joined.len() < picked {
        tracing::debug!(
            dropped = picked - joined.len(),
            "Most-rated ids without a movie row were dropped"
        );
    }
    joined
}

/// Frequency of each distinct rating value, ascending by value.
pub fn rating_distribution(ratings: &[Rating]) -> Vec<ScoreBucket> {
    let mut buckets: BTreeMap<Score, usize> = BTreeMap::new();
    for rating in ratings {
        *buckets.entry(rating.rating).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(rating, count)| ScoreBucket { rating, count })
        .collect()
}

/// Mean rating and rating count per movie, ascending by `MovieId`.
pub fn mean_rating_per_movie(ratings: &[Rating]) -> BTreeMap<MovieId, (f64, usize)> {
    let mut sums: BTreeMap<MovieId, (f64, usize)> = BTreeMap::new();
    for rating in ratings {
        let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
        entry.0 += rating.rating.value();
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(id, (sum, count))| (id, (sum / count as f64, count)))
        .collect()
}

/// The `n` movies with the highest mean rating.
///
/// Titles are joined first (dropping ids without a movie row), then rows are
/// sorted by mean descending with ties by ascending id, then truncated.
pub fn top_by_average(dataset: &Dataset, n: usize) -> Vec<MovieAverage> {
    let mut averages: Vec<MovieAverage> = mean_rating_per_movie(dataset.ratings())
        .into_iter()
        .filter_map(|(movie_id, (mean_rating, rating_count))| {
            dataset.title(movie_id).map(|title| MovieAverage {
                movie_id,
                title: title.to_string(),
                mean_rating,
                rating_count,
            })
        })
        .collect();
    averages.sort_by(compare_average);
    averages.truncate(n);
    averages
}

fn compare_average(a: &MovieAverage, b: &MovieAverage) -> Ordering {
    b.mean_rating
        .total_cmp(&a.mean_rating)
        .then(a.movie_id.cmp(&b.movie_id))
}

/// Number of ratings per user, ascending by `UserId`.
pub fn user_activity(ratings: &[Rating]) -> Vec<UserActivity> {
    let mut counts: BTreeMap<UserId, usize> = BTreeMap::new();
    for rating in ratings {
        *counts.entry(rating.user_id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(user_id, num_ratings)| UserActivity {
            user_id,
            num_ratings,
        })
        .collect()
}

/// Number of movies per genre tag, descending by count with ties by tag.
///
/// A tag counts once per movie even if repeated in its genres field.
pub fn genre_counts<'a>(
    movies: impl IntoIterator<Item = &'a Movie>,
    separator: char,
) -> Vec<GenreCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for movie in movies {
        for tag in movie.genre_tags(separator) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    let mut rows: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, movie_count)| GenreCount {
            genre: genre.to_string(),
            movie_count,
        })
        .collect();
    // BTreeMap already yields tags ascending; a stable sort keeps that for ties.
    rows.sort_by(|a, b| b.movie_count.cmp(&a.movie_count));
    rows
}

// =============================================================================
// TESTS
// =============================================================================
