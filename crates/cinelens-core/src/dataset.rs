//! # Dataset
//!
//! The two in-memory tables plus their column profiles.
//!
//! Movies are keyed by `MovieId` in a `BTreeMap`, which enforces the
//! uniqueness invariant and gives the title joins a deterministic lookup.
//! Ratings keep their file order.

use crate::profile::{ColumnKind, ColumnProfile, TableProfile};
use crate::{AnalysisConfig, Error, Movie, MovieId, Rating, Result};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// The loaded, read-only dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    movies: BTreeMap<MovieId, Movie>,
    ratings: Vec<Rating>,
    movie_profile: TableProfile,
    rating_profile: TableProfile,
}

impl Dataset {
    /// Build a dataset from typed rows with the default configuration.
    ///
    /// Profiles are derived from the typed fields. Use
    /// [`crate::formats::load_dataset`] to keep the raw CSV profile instead.
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>) -> Result<Self> {
        Self::from_rows(movies, ratings, &AnalysisConfig::default())
    }

    /// Build a dataset from typed rows, keeping `config.head_rows` rows of
    /// each table for the head preview.
    pub fn from_rows(
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let movie_profile = profile_movies(&movies, config.head_rows);
        let rating_profile = profile_ratings(&ratings, config.head_rows);
        Self::with_profiles(movies, ratings, movie_profile, rating_profile)
    }

    /// Build a dataset from typed rows and profiles gathered while decoding.
    pub fn with_profiles(
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
        movie_profile: TableProfile,
        rating_profile: TableProfile,
    ) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for movie in movies {
            match by_id.entry(movie.movie_id) {
                Entry::Vacant(slot) => {
                    slot.insert(movie);
                }
                Entry::Occupied(_) => return Err(Error::DuplicateMovie(movie.movie_id)),
            }
        }
        Ok(Self {
            movies: by_id,
            ratings,
            movie_profile,
            rating_profile,
        })
    }

    /// Movies in ascending `MovieId` order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Ratings in load order.
    #[must_use]
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Look up a movie row.
    #[must_use]
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Title of a movie, if the movie table has it.
    #[must_use]
    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.movies.get(&id).map(|m| m.title.as_str())
    }

    #[must_use]
    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    #[must_use]
    pub fn movie_profile(&self) -> &TableProfile {
        &self.movie_profile
    }

    #[must_use]
    pub fn rating_profile(&self) -> &TableProfile {
        &self.rating_profile
    }
}

// =============================================================================
// PROFILES FROM TYPED ROWS
// =============================================================================

fn profile_movies(movies: &[Movie], head_rows: usize) -> TableProfile {
    let with_genres = movies.iter().filter(|m| m.genres.is_some()).count();
    TableProfile {
        name: "movies".to_string(),
        row_count: movies.len(),
        columns: vec![
            column("movieId", ColumnKind::Int64, movies.len()),
            column("title", ColumnKind::Object, movies.len()),
            column("genres", ColumnKind::Object, with_genres),
        ],
        head: movies
            .iter()
            .take(head_rows)
            .map(|m| {
                vec![
                    m.movie_id.to_string(),
                    m.title.clone(),
                    m.genres.clone().unwrap_or_default(),
                ]
            })
            .collect(),
    }
}

fn profile_ratings(ratings: &[Rating], head_rows: usize) -> TableProfile {
    let mut columns = vec![
        column("userId", ColumnKind::Int64, ratings.len()),
        column("movieId", ColumnKind::Int64, ratings.len()),
        column("rating", ColumnKind::Float64, ratings.len()),
    ];
    let stamped = ratings.iter().filter(|r| r.timestamp.is_some()).count();
    if stamped > 0 {
        columns.push(column("timestamp", ColumnKind::Int64, stamped));
    }
    TableProfile {
        name: "ratings".to_string(),
        row_count: ratings.len(),
        head: ratings
            .iter()
            .take(head_rows)
            .map(|r| {
                let mut row = vec![
                    r.user_id.to_string(),
                    r.movie_id.to_string(),
                    r.rating.to_string(),
                ];
                if stamped > 0 {
                    row.push(r.timestamp.map(|t| t.to_string()).unwrap_or_default());
                }
                row
            })
            .collect(),
        columns,
    }
}

fn column(name: &str, kind: ColumnKind, non_null: usize) -> ColumnProfile {
    ColumnProfile {
        name: name.to_string(),
        kind,
        non_null,
    }
}

// =============================================================================
// TESTS
// =============================================================================
