//! Integration tests for Cinelens CLI commands.
//!
//! Uses tempfile for the CSV inputs and the chart output directory.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use cinelens::charts::{GENRE_CHART_FILE, RATING_CHART_FILE};
use cinelens::cli::{
    CliError, DataPaths, cmd_counts, cmd_distribution, cmd_genres, cmd_head, cmd_most_rated,
    cmd_plot, cmd_report, cmd_summary, cmd_top_average, cmd_users, load,
};
use cinelens_core::aggregate::{genre_counts, most_rated, top_by_average, user_activity};
use cinelens_core::{AnalysisConfig, EdaReport, MovieId, UserId};
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const MOVIES_CSV: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Grumpier Old Men (1995),Comedy|Romance
6,Heat (1995),Action|Crime|Thriller
11,\"American President, The (1995)\",Comedy|Drama|Romance
";

const RATINGS_CSV: &str = "userId,movieId,rating,timestamp
1,1,4.0,964982703
1,3,4.0,964981247
1,6,4.0,964982224
2,1,5.0,964983815
2,2,3.5,964982931
3,1,3.0,964982400
3,11,5.0,964980868
3,42,1.0,964980900
";

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write both tables and return their paths.
fn create_dataset(dir: &TempDir) -> DataPaths {
    let movies = dir.path().join("movies.csv");
    let ratings = dir.path().join("ratings.csv");
    std::fs::write(&movies, MOVIES_CSV).unwrap();
    std::fs::write(&ratings, RATINGS_CSV).unwrap();
    DataPaths::new(movies, ratings)
}

fn config() -> AnalysisConfig {
    AnalysisConfig::default()
}

// =============================================================================
// LOAD TESTS
// =============================================================================

#[test]
fn test_load_reads_both_tables() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);

    let dataset = load(&paths, &config()).unwrap();
    assert_eq!(dataset.movie_count(), 5);
    assert_eq!(dataset.rating_count(), 8);
    assert_eq!(dataset.rating_profile().column_count(), 4);
}

#[test]
fn test_load_missing_file_fails() {
    let temp = create_temp_dir();
    let paths = DataPaths::new(temp.path().join("nope.csv"), temp.path().join("nope2.csv"));

    let result = load(&paths, &config());
    assert!(matches!(result, Err(CliError::Io { .. })));
}

#[test]
fn test_load_missing_column_fails() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    std::fs::write(&paths.ratings, "userId,movieId\n1,1\n").unwrap();

    let result = load(&paths, &config());
    assert!(matches!(result, Err(CliError::Core(_))));
}

#[test]
fn test_load_duplicate_movie_fails() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    std::fs::write(&paths.movies, "movieId,title,genres\n1,A,Drama\n1,B,Drama\n").unwrap();

    assert!(load(&paths, &config()).is_err());
}

// =============================================================================
// AGGREGATE RESULT TESTS
// =============================================================================

#[test]
fn test_most_rated_from_files() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let dataset = load(&paths, &config()).unwrap();

    let top = most_rated(&dataset, 5);
    assert_eq!(top[0].movie_id, MovieId(1));
    assert_eq!(top[0].rating_count, 3);
    let ids: Vec<_> = top.iter().map(|m| m.movie_id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 6, 11]);

    // Six ids make the cut; movie 42 has no title and is dropped.
    assert_eq!(most_rated(&dataset, 6).len(), 5);
}

#[test]
fn test_top_average_from_files() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let dataset = load(&paths, &config()).unwrap();

    let top = top_by_average(&dataset, 5);
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].title, "American President, The (1995)");
    assert_eq!(top[0].mean_rating, 5.0);
    let toy_story = top.iter().find(|m| m.movie_id == MovieId(1)).unwrap();
    assert_eq!(toy_story.mean_rating, 4.0);
}

#[test]
fn test_user_activity_from_files() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let dataset = load(&paths, &config()).unwrap();

    let activity = user_activity(dataset.ratings());
    let counts: Vec<_> = activity.iter().map(|u| (u.user_id, u.num_ratings)).collect();
    assert_eq!(counts, vec![(UserId(1), 3), (UserId(2), 2), (UserId(3), 3)]);
}

#[test]
fn test_genre_counts_from_files() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let dataset = load(&paths, &config()).unwrap();

    let genres = genre_counts(dataset.movies(), '|');
    assert_eq!(genres[0].genre, "Comedy");
    assert_eq!(genres[0].movie_count, 3);
    let total_tags: usize = genres.iter().map(|g| g.movie_count).sum();
    assert_eq!(total_tags, 5 + 3 + 2 + 3 + 3);
}

// =============================================================================
// COMMAND TESTS
// =============================================================================

#[test]
fn test_single_commands_text_mode() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let config = config();

    assert!(cmd_summary(&paths, &config, false).is_ok());
    assert!(cmd_head(&paths, &config, false).is_ok());
    assert!(cmd_counts(&paths, &config, false).is_ok());
    assert!(cmd_most_rated(&paths, &config, false).is_ok());
    assert!(cmd_distribution(&paths, &config, false).is_ok());
    assert!(cmd_top_average(&paths, &config, false).is_ok());
    assert!(cmd_users(&paths, &config, false).is_ok());
    assert!(cmd_genres(&paths, &config, false).is_ok());
}

#[test]
fn test_single_commands_json_mode() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let config = config();

    assert!(cmd_summary(&paths, &config, true).is_ok());
    assert!(cmd_head(&paths, &config, true).is_ok());
    assert!(cmd_counts(&paths, &config, true).is_ok());
    assert!(cmd_genres(&paths, &config, true).is_ok());
}

#[test]
fn test_command_with_missing_input_fails() {
    let temp = create_temp_dir();
    let paths = DataPaths::new(temp.path().join("a.csv"), temp.path().join("b.csv"));

    assert!(cmd_counts(&paths, &config(), false).is_err());
}

#[test]
fn test_report_writes_charts() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let out_dir = temp.path().join("plots");

    let result = cmd_report(&paths, &config(), false, Some(&out_dir));
    assert!(result.is_ok());
    assert!(out_dir.join(RATING_CHART_FILE).exists());
    assert!(out_dir.join(GENRE_CHART_FILE).exists());
}

#[test]
fn test_report_without_plots() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);

    let result = cmd_report(&paths, &config(), true, None);
    assert!(result.is_ok());
    assert!(!temp.path().join("plots").exists());
}

#[test]
fn test_report_skips_empty_charts() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    std::fs::write(&paths.ratings, "userId,movieId,rating\n").unwrap();
    let out_dir = temp.path().join("plots");

    let result = cmd_report(&paths, &config(), false, Some(&out_dir));
    assert!(result.is_ok());
    assert!(!out_dir.join(RATING_CHART_FILE).exists());
    assert!(out_dir.join(GENRE_CHART_FILE).exists());
}

#[test]
fn test_plot_fails_on_empty_series() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    std::fs::write(&paths.ratings, "userId,movieId,rating\n").unwrap();

    let result = cmd_plot(&paths, &config(), &temp.path().join("plots"));
    assert!(matches!(result, Err(CliError::EmptySeries(_))));
}

#[test]
fn test_plot_returns_written_paths() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);
    let out_dir = temp.path().join("charts");

    let written = cmd_plot(&paths, &config(), &out_dir).unwrap();
    assert_eq!(written.len(), 2);
    for path in written {
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }
}

// =============================================================================
// DETERMINISM TESTS
// =============================================================================

#[test]
fn test_report_json_is_deterministic() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);

    let first = EdaReport::build(&load(&paths, &config()).unwrap(), &config());
    let second = EdaReport::build(&load(&paths, &config()).unwrap(), &config());

    let json1 = serde_json::to_string(&first).unwrap();
    let json2 = serde_json::to_string(&second).unwrap();
    assert_eq!(json1, json2, "Report JSON should be deterministic");
    assert_eq!(first.to_text(), second.to_text());
}

#[test]
fn test_report_json_roundtrips() {
    let temp = create_temp_dir();
    let paths = create_dataset(&temp);

    let report = EdaReport::build(&load(&paths, &config()).unwrap(), &config());
    let json = serde_json::to_string(&report).unwrap();
    let parsed: EdaReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}
