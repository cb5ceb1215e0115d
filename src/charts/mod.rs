//! Chart rendering.
//!
//! Five independent charts, each computing the slice of the cleaned table it
//! needs, drawn to a fixed PNG file name in the output directory.

pub mod plots;

use crate::analysis::{
    binned_means, cross_means, group_means, histogram, present_values, stats,
};
use crate::models::{ensure_rows, numeric, TableError};
use polars::prelude::{ChunkVar, DataFrame};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const FARE_BY_AGE: &str = "fare_by_age.png";
pub const SURVIVAL_BY_CLASS: &str = "survival_by_class.png";
pub const AGE_DISTRIBUTION: &str = "age_distribution.png";
pub const FARE_VS_AGE: &str = "fare_vs_age.png";
pub const SURVIVAL_BY_CLASS_SEX: &str = "survival_by_class_sex.png";

/// Every chart file, in rendering order.
pub const CHART_FILES: [&str; 5] = [
    FARE_BY_AGE,
    SURVIVAL_BY_CLASS,
    AGE_DISTRIBUTION,
    FARE_VS_AGE,
    SURVIVAL_BY_CLASS_SEX,
];

/// Age bin edges for the fare line chart: `(0, 5], (5, 10], ..., (75, 80]`.
pub fn age_bin_edges() -> Vec<f64> {
    (0..=80).step_by(5).map(f64::from).collect()
}

pub const AGE_HISTOGRAM_BINS: usize = 30;
pub const KDE_POINTS: usize = 200;

/// Errors raised while rendering charts.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to draw {file}: {message}")]
    Draw { file: String, message: String },

    #[error(transparent)]
    Data(#[from] TableError),
}

fn draw_error(file: &str, err: Box<dyn std::error::Error>) -> ChartError {
    ChartError::Draw {
        file: file.to_string(),
        message: err.to_string(),
    }
}

/// Render all five charts into `output_dir`. Returns the written paths.
pub fn render_all(table: &DataFrame, output_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    ensure_rows(table)?;

    std::fs::create_dir_all(output_dir).map_err(|source| ChartError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let renderers: [fn(&DataFrame, &Path) -> Result<(), ChartError>; 5] = [
        render_fare_by_age,
        render_survival_by_class,
        render_age_distribution,
        render_fare_vs_age,
        render_survival_by_class_sex,
    ];

    let mut written = Vec::with_capacity(CHART_FILES.len());
    for (file, render) in CHART_FILES.into_iter().zip(renderers) {
        let path = output_dir.join(file);
        debug!("Rendering {}", path.display());
        render(table, &path)?;
        info!("Saved chart: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Survival percentage per class, in class order.
pub fn survival_rates_by_class(table: &DataFrame) -> Result<Vec<(String, f64)>, TableError> {
    let grouped = group_means(table, "class", &["survived"])?;
    Ok(grouped
        .group_names()
        .filter_map(|class| {
            grouped
                .get(class, "survived")
                .map(|rate| (class.to_string(), rate * 100.0))
        })
        .collect())
}

/// `(age, fare, survived)` for every row with both values present.
pub fn fare_age_points(table: &DataFrame) -> Result<Vec<(f64, f64, bool)>, TableError> {
    let ages = numeric(table, "age")?;
    let fares = numeric(table, "fare")?;
    let survived = numeric(table, "survived")?;

    Ok(ages
        .into_iter()
        .zip(fares.into_iter())
        .zip(survived.into_iter())
        .filter_map(|((a, f), s)| Some((a?, f?, s? > 0.5)))
        .collect())
}

fn render_fare_by_age(table: &DataFrame, path: &Path) -> Result<(), ChartError> {
    let bins = binned_means(table, "age", "fare", &age_bin_edges())?;
    plots::fare_by_age(path, &bins).map_err(|e| draw_error(FARE_BY_AGE, e))
}

fn render_survival_by_class(table: &DataFrame, path: &Path) -> Result<(), ChartError> {
    let rates = survival_rates_by_class(table)?;
    plots::survival_by_class(path, &rates).map_err(|e| draw_error(SURVIVAL_BY_CLASS, e))
}

fn render_age_distribution(table: &DataFrame, path: &Path) -> Result<(), ChartError> {
    let ages = present_values(table, "age")?;
    let hist = histogram(&ages, AGE_HISTOGRAM_BINS);
    let kde = stats::gaussian_kde(&ages, numeric(table, "age")?.std(1), KDE_POINTS);
    plots::age_distribution(path, &hist, &kde, ages.len())
        .map_err(|e| draw_error(AGE_DISTRIBUTION, e))
}

fn render_fare_vs_age(table: &DataFrame, path: &Path) -> Result<(), ChartError> {
    let points = fare_age_points(table)?;
    plots::fare_vs_age(path, &points).map_err(|e| draw_error(FARE_VS_AGE, e))
}

fn render_survival_by_class_sex(table: &DataFrame, path: &Path) -> Result<(), ChartError> {
    let cells = cross_means(table, "class", "sex", "survived")?;
    plots::survival_by_class_sex(path, &cells).map_err(|e| draw_error(SURVIVAL_BY_CLASS_SEX, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::clean;
    use crate::dataset::tests::fixture_table;
    use plotters::prelude::{BitMapBackend, IntoDrawingArea, IntoFont, Text};

    fn cleaned_fixture() -> DataFrame {
        let mut table = fixture_table();
        clean(&mut table).unwrap();
        table
    }

    #[test]
    fn test_age_bin_edges() {
        let edges = age_bin_edges();
        assert_eq!(edges.len(), 17);
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&80.0));
    }

    #[test]
    fn test_survival_rates_by_class_are_percentages() {
        let table = cleaned_fixture();
        let rates = survival_rates_by_class(&table).unwrap();

        let classes: Vec<&str> = rates.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(classes, vec!["First", "Second", "Third"]);
        assert!(rates.iter().all(|(_, r)| (0.0..=100.0).contains(r)));
        // Second class in the sample: 3 passengers, all survived.
        assert_eq!(rates[1].1, 100.0);
    }

    #[test]
    fn test_fare_age_points() {
        let table = cleaned_fixture();
        let points = fare_age_points(&table).unwrap();

        assert_eq!(points.len(), table.height());
        assert_eq!(points[0], (22.0, 7.25, false));
        assert_eq!(points[1], (38.0, 71.2833, true));
    }

    #[test]
    fn test_render_all_rejects_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_all(&DataFrame::empty(), dir.path()).unwrap_err();
        assert!(matches!(err, ChartError::Data(TableError::EmptyTable)));
    }

    /// Whether plotters can find a font to draw text with.
    fn fonts_available() -> bool {
        let mut buffer = vec![0u8; 64 * 64 * 3];
        let root = BitMapBackend::with_buffer(&mut buffer, (64, 64)).into_drawing_area();
        let drawn = root
            .draw(&Text::new("Age", (0, 0), ("sans-serif", 12).into_font()))
            .is_ok();
        drawn
    }

    /// `(width, height)` from the IHDR chunk of a PNG.
    fn png_size(bytes: &[u8]) -> (u32, u32) {
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "not a PNG");
        assert_eq!(&bytes[12..16], b"IHDR");
        let word = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        (word(16), word(20))
    }

    #[test]
    fn test_render_all_writes_every_file() {
        if !fonts_available() {
            eprintln!("skipping chart rendering: no usable system font");
            return;
        }

        let table = cleaned_fixture();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        let written = render_all(&table, first.path()).unwrap();
        render_all(&table, second.path()).unwrap();

        let expected = [
            (FARE_BY_AGE, (1200, 600)),
            (SURVIVAL_BY_CLASS, (1000, 600)),
            (AGE_DISTRIBUTION, (1200, 600)),
            (FARE_VS_AGE, (1200, 800)),
            (SURVIVAL_BY_CLASS_SEX, (1200, 600)),
        ];
        assert_eq!(
            written,
            CHART_FILES.iter().map(|f| first.path().join(f)).collect::<Vec<_>>()
        );

        for (file, size) in expected {
            let bytes = std::fs::read(first.path().join(file)).unwrap();
            assert_eq!(png_size(&bytes), size, "{}", file);

            let again = std::fs::read(second.path().join(file)).unwrap();
            assert!(bytes == again, "{} differs between runs", file);
        }
    }
}
