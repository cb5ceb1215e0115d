//! Dataset loading.
//!
//! Resolves where the passenger CSV comes from (an explicit local file or
//! the cached reference download), fetches it if needed and decodes it into
//! a polars [`DataFrame`].

pub mod fetch;
pub mod parse;

pub use fetch::{download_to, FetchOptions};
pub use parse::read_table;

use polars::prelude::{DataFrame, PolarsError};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Well-known name of the reference dataset.
pub const DATASET_NAME: &str = "titanic";

/// Where the reference dataset is published.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/titanic.csv";

/// Errors raised while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed CSV: {0}")]
    Csv(#[from] PolarsError),

    #[error("dataset is not cached at {0} and downloads are disabled")]
    NotCached(PathBuf),

    #[error("dataset has no rows")]
    Empty,
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// A CSV file on disk with the reference schema.
    Local(PathBuf),
    /// The reference dataset, cached under `cache_dir`.
    Remote {
        url: String,
        cache_dir: PathBuf,
        timeout_seconds: u64,
        offline: bool,
    },
}

impl DatasetSource {
    /// Short description for progress output.
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Local(path) => path.display().to_string(),
            DatasetSource::Remote { url, .. } => format!("{} ({})", DATASET_NAME, url),
        }
    }
}

/// Path of the cached copy inside `cache_dir`.
pub fn cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("{}.csv", DATASET_NAME))
}

/// Load the dataset from `source`.
pub fn load_dataset(source: &DatasetSource, show_progress: bool) -> Result<DataFrame, LoadError> {
    let path = match source {
        DatasetSource::Local(path) => {
            info!("Using local dataset: {}", path.display());
            path.clone()
        }
        DatasetSource::Remote {
            url,
            cache_dir,
            timeout_seconds,
            offline,
        } => {
            let cached = cache_path(cache_dir);

            if cached.is_file() {
                debug!("Cache hit: {}", cached.display());
            } else if *offline {
                return Err(LoadError::NotCached(cached));
            } else {
                let options = FetchOptions {
                    timeout_seconds: *timeout_seconds,
                    show_progress,
                };
                download_to(url, &cached, &options)?;
            }

            cached
        }
    };

    read_csv_file(&path)
}

/// Decode a CSV file into a table.
pub fn read_csv_file(path: &Path) -> Result<DataFrame, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = read_table(file)?;

    if df.height() == 0 {
        return Err(LoadError::Empty);
    }

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}
