//! # CLI Module
//!
//! Command-line interface for Cinelens.
//!
//! Each subcommand has a public `cmd_*` function that loads the two tables,
//! computes its part of the analysis and prints it to stdout, as text or as
//! JSON. Logs go to stderr so stdout carries only analysis output.

use crate::charts;
use cinelens_core::aggregate;
use cinelens_core::formats::load_dataset;
use cinelens_core::report::{
    cardinality_text, distribution_text, genre_counts_text, most_rated_text, top_by_average_text,
    user_activity_text,
};
use cinelens_core::{
    AnalysisConfig, DEFAULT_HEAD_ROWS, DEFAULT_TOP_N, Dataset, EdaReport, TableProfile,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file or directory could not be opened or created.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding or validating the dataset failed.
    #[error(transparent)]
    Core(#[from] cinelens_core::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The chart backend failed.
    #[error("failed to render chart {}: {message}", path.display())]
    Chart { path: PathBuf, message: String },

    /// A chart was requested for a series with no data.
    #[error("nothing to plot for '{0}'")]
    EmptySeries(&'static str),
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Default directory for the SVG charts.
pub const DEFAULT_PLOT_DIR: &str = "plots";

/// Exploratory analysis of a movie-ratings dataset.
#[derive(Debug, Parser)]
#[command(name = "cinelens", version, about)]
pub struct Cli {
    /// Movie table (CSV with movieId,title,genres)
    #[arg(long, global = true, default_value = "movies.csv")]
    pub movies: PathBuf,

    /// Rating table (CSV with userId,movieId,rating)
    #[arg(long, global = true, default_value = "ratings.csv")]
    pub ratings: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Rows in the head preview
    #[arg(long, global = true, default_value_t = DEFAULT_HEAD_ROWS)]
    pub head_rows: usize,

    /// Length of the most-rated and top-average lists
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full analysis followed by both charts (default)
    Report {
        /// Directory for the SVG charts
        #[arg(long, default_value = DEFAULT_PLOT_DIR)]
        out_dir: PathBuf,
        /// Skip chart rendering
        #[arg(long)]
        no_plots: bool,
    },
    /// Column kinds and null counts of both tables
    Summary,
    /// First rows of both tables
    Head,
    /// Distinct users, distinct movies and total ratings
    Counts,
    /// Movies with the most ratings
    MostRated,
    /// Number of ratings per rating value
    Distribution,
    /// Movies with the highest mean rating
    TopAverage,
    /// Number of ratings per user
    Users,
    /// Number of movies per genre
    Genres,
    /// Render both charts only
    Plot {
        /// Directory for the SVG charts
        #[arg(long, default_value = DEFAULT_PLOT_DIR)]
        out_dir: PathBuf,
    },
}

/// Locations of the two input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub movies: PathBuf,
    pub ratings: PathBuf,
}

impl DataPaths {
    pub fn new(movies: impl Into<PathBuf>, ratings: impl Into<PathBuf>) -> Self {
        Self {
            movies: movies.into(),
            ratings: ratings.into(),
        }
    }
}

impl Cli {
    #[must_use]
    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.movies, &self.ratings)
    }

    #[must_use]
    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            top_n: self.top,
            head_rows: self.head_rows,
            ..AnalysisConfig::default()
        }
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let paths = cli.paths();
    let config = cli.config();
    let json = cli.json;

    match cli.command {
        None => cmd_report(&paths, &config, json, Some(Path::new(DEFAULT_PLOT_DIR))),
        Some(Command::Report { out_dir, no_plots }) => {
            let out_dir = if no_plots { None } else { Some(out_dir) };
            cmd_report(&paths, &config, json, out_dir.as_deref())
        }
        Some(Command::Summary) => cmd_summary(&paths, &config, json),
        Some(Command::Head) => cmd_head(&paths, &config, json),
        Some(Command::Counts) => cmd_counts(&paths, &config, json),
        Some(Command::MostRated) => cmd_most_rated(&paths, &config, json),
        Some(Command::Distribution) => cmd_distribution(&paths, &config, json),
        Some(Command::TopAverage) => cmd_top_average(&paths, &config, json),
        Some(Command::Users) => cmd_users(&paths, &config, json),
        Some(Command::Genres) => cmd_genres(&paths, &config, json),
        Some(Command::Plot { out_dir }) => cmd_plot(&paths, &config, &out_dir).map(|_| ()),
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Open both files and decode them into a [`Dataset`].
pub fn load(paths: &DataPaths, config: &AnalysisConfig) -> Result<Dataset, CliError> {
    let movies = open(&paths.movies)?;
    let ratings = open(&paths.ratings)?;
    tracing::info!(
        movies = %paths.movies.display(),
        ratings = %paths.ratings.display(),
        "Loading dataset"
    );
    Ok(load_dataset(movies, ratings, config)?)
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Print `value` as pretty JSON, or the text produced by `text`.
fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

#[derive(Serialize)]
struct TablePair<'a> {
    movies: &'a TableProfile,
    ratings: &'a TableProfile,
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Full analysis in reading order, then both charts when `out_dir` is set.
///
/// An empty series is skipped with a warning instead of failing the report.
pub fn cmd_report(
    paths: &DataPaths,
    config: &AnalysisConfig,
    json: bool,
    out_dir: Option<&Path>,
) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let report = EdaReport::build(&dataset, config);
    emit(json, &report, || report.to_text())?;

    if let Some(out_dir) = out_dir {
        for rendered in [
            charts::render_rating_distribution(&report.rating_distribution, out_dir),
            charts::render_genre_counts(&report.genre_counts, out_dir),
        ] {
            match rendered {
                Ok(path) => {
                    if !json {
                        println!("Saved chart to {}", path.display());
                    }
                }
                Err(CliError::EmptySeries(title)) => {
                    tracing::warn!(chart = title, "Skipping chart with no data");
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(())
}

pub fn cmd_summary(paths: &DataPaths, config: &AnalysisConfig, json: bool) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let pair = TablePair {
        movies: dataset.movie_profile(),
        ratings: dataset.rating_profile(),
    };
    emit(json, &pair, || {
        format!("{}\n{}", pair.movies.summary_text(), pair.ratings.summary_text())
    })
}

pub fn cmd_head(paths: &DataPaths, config: &AnalysisConfig, json: bool) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let heads = serde_json::json!({
        "movies": dataset.movie_profile().head,
        "ratings": dataset.rating_profile().head,
    });
    emit(json, &heads, || {
        format!(
            "{}\n{}",
            dataset.movie_profile().head_text(),
            dataset.rating_profile().head_text()
        )
    })
}

pub fn cmd_counts(paths: &DataPaths, config: &AnalysisConfig, json: bool) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let counts = aggregate::cardinality(dataset.ratings());
    emit(json, &counts, || cardinality_text(&counts))
}

pub fn cmd_most_rated(
    paths: &DataPaths,
    config: &AnalysisConfig,
    json: bool,
) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let rows = aggregate::most_rated(&dataset, config.top_n);
    emit(json, &rows, || most_rated_text(&rows))
}

pub fn cmd_distribution(
    paths: &DataPaths,
    config: &AnalysisConfig,
    json: bool,
) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let buckets = aggregate::rating_distribution(dataset.ratings());
    emit(json, &buckets, || distribution_text(&buckets))
}

pub fn cmd_top_average(
    paths: &DataPaths,
    config: &AnalysisConfig,
    json: bool,
) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let rows = aggregate::top_by_average(&dataset, config.top_n);
    emit(json, &rows, || top_by_average_text(&rows))
}

pub fn cmd_users(paths: &DataPaths, config: &AnalysisConfig, json: bool) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let rows = aggregate::user_activity(dataset.ratings());
    emit(json, &rows, || user_activity_text(&rows))
}

pub fn cmd_genres(paths: &DataPaths, config: &AnalysisConfig, json: bool) -> Result<(), CliError> {
    let dataset = load(paths, config)?;
    let rows = aggregate::genre_counts(dataset.movies(), config.genre_separator);
    emit(json, &rows, || genre_counts_text(&rows))
}

/// Render both charts into `out_dir` and return the written paths.
pub fn cmd_plot(
    paths: &DataPaths,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, CliError> {
    let dataset = load(paths, config)?;
    let buckets = aggregate::rating_distribution(dataset.ratings());
    let genres = aggregate::genre_counts(dataset.movies(), config.genre_separator);

    let written = vec![
        charts::render_rating_distribution(&buckets, out_dir)?,
        charts::render_genre_counts(&genres, out_dir)?,
    ];
    for path in &written {
        println!("Saved chart to {}", path.display());
    }
    Ok(written)
}

// =============================================================================
// TESTS
// =============================================================================
