//! # Charts
//!
//! SVG bar charts for the rating distribution and the genre counts.
//!
//! Charts are written with the plotters SVG backend, which emits text as SVG
//! `<text>` nodes and needs no system fonts.

use crate::cli::CliError;
use cinelens_core::aggregate::{GenreCount, ScoreBucket};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

/// File name of the rating distribution chart.
pub const RATING_CHART_FILE: &str = "rating_distribution.svg";

/// File name of the genre chart.
pub const GENRE_CHART_FILE: &str = "genre_counts.svg";

/// A labelled bar chart ready to be drawn.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub size: (u32, u32),
    /// Draw x tick labels vertically (long category names).
    pub rotate_labels: bool,
    pub bars: Vec<(String, u64)>,
}

impl BarChart {
    /// One bar per rating value.
    #[must_use]
    pub fn rating_distribution(buckets: &[ScoreBucket]) -> Self {
        Self {
            title: "Rating Distribution",
            x_desc: "Rating",
            y_desc: "Count",
            size: (600, 400),
            rotate_labels: false,
            bars: buckets
                .iter()
                .map(|b| (b.rating.to_string(), b.count as u64))
                .collect(),
        }
    }

    /// One bar per genre tag, in the order given.
    #[must_use]
    pub fn genre_counts(genres: &[GenreCount]) -> Self {
        Self {
            title: "Number of Movies per Genre",
            x_desc: "Genre",
            y_desc: "Number of Movies",
            size: (1000, 500),
            rotate_labels: true,
            bars: genres
                .iter()
                .map(|g| (g.genre.clone(), g.movie_count as u64))
                .collect(),
        }
    }
}

/// Render the rating distribution into `out_dir`.
pub fn render_rating_distribution(
    buckets: &[ScoreBucket],
    out_dir: &Path,
) -> Result<PathBuf, CliError> {
    let path = out_dir.join(RATING_CHART_FILE);
    render_bar_chart(&BarChart::rating_distribution(buckets), &path)?;
    Ok(path)
}

/// Render the genre counts into `out_dir`.
pub fn render_genre_counts(genres: &[GenreCount], out_dir: &Path) -> Result<PathBuf, CliError> {
    let path = out_dir.join(GENRE_CHART_FILE);
    render_bar_chart(&BarChart::genre_counts(genres), &path)?;
    Ok(path)
}

/// Draw a bar chart to an SVG file.
///
/// Fails with [`CliError::EmptySeries`] when there is nothing to draw.
pub fn render_bar_chart(chart: &BarChart, path: &Path) -> Result<(), CliError> {
    if chart.bars.is_empty() {
        return Err(CliError::EmptySeries(chart.title));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    draw_bars(chart, path).map_err(|e| CliError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), bars = chart.bars.len(), "Chart written");
    Ok(())
}

fn draw_bars(chart: &BarChart, path: &Path) -> Result<(), Box<dyn StdError>> {
    let root = SVGBackend::new(path, chart.size).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = chart.bars.len() as u32;
    let y_max = chart.bars.iter().map(|(_, v)| *v).max().unwrap_or(0);
    let y_top = y_max + y_max / 10 + 1;

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(if chart.rotate_labels { 120 } else { 40 })
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u64..y_top)?;

    let labels: Vec<&str> = chart.bars.iter().map(|(label, _)| label.as_str()).collect();
    let formatter = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => labels
            .get(*i as usize)
            .map(|l| (*l).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut mesh = ctx.configure_mesh();
    mesh.disable_x_mesh()
        .x_desc(chart.x_desc)
        .y_desc(chart.y_desc)
        .x_labels(labels.len() + 1)
        .x_label_formatter(&formatter);
    if chart.rotate_labels {
        mesh.x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        );
    }
    mesh.draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BLUE.mix(0.7).filled())
            .margin(6)
            .data(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, (_, count))| (i as u32, *count)),
            ),
    )?;

    root.present()?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinelens_core::Score;

    fn buckets() -> Vec<ScoreBucket> {
        vec![
            ScoreBucket {
                rating: Score::new(3.0).unwrap(),
                count: 4,
            },
            ScoreBucket {
                rating: Score::new(4.5).unwrap(),
                count: 9,
            },
        ]
    }

    #[test]
    fn rating_chart_labels() {
        let chart = BarChart::rating_distribution(&buckets());
        assert_eq!(
            chart.bars,
            vec![("3.0".to_string(), 4), ("4.5".to_string(), 9)]
        );
        assert_eq!(chart.size, (600, 400));
    }

    #[test]
    fn genre_chart_keeps_order() {
        let genres = vec![
            GenreCount {
                genre: "Drama".into(),
                movie_count: 10,
            },
            GenreCount {
                genre: "Comedy".into(),
                movie_count: 7,
            },
        ];
        let chart = BarChart::genre_counts(&genres);
        assert_eq!(chart.bars[0].0, "Drama");
        assert!(chart.rotate_labels);
    }

    #[test]
    fn empty_series_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_genre_counts(&[], dir.path());
        assert!(matches!(result, Err(CliError::EmptySeries(_))));
        assert!(!dir.path().join(GENRE_CHART_FILE).exists());
    }

    #[test]
    fn writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_rating_distribution(&buckets(), &dir.path().join("plots")).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Rating Distribution"));
    }
}
