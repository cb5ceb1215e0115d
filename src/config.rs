//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.titanic-eda.toml` files.

use crate::dataset::{DatasetSource, DEFAULT_DATASET_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".titanic-eda.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset source settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Chart output settings.
    #[serde(default)]
    pub charts: ChartsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// URL of the reference CSV.
    #[serde(default = "default_url")]
    pub url: String,

    /// Directory holding the downloaded copy.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Download timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Read this local CSV instead of the reference dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Never download; use the cache only.
    #[serde(default)]
    pub offline: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            cache_dir: default_cache_dir(),
            timeout_seconds: default_timeout(),
            path: None,
            offline: false,
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_cache_dir() -> String {
    "seaborn-data".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl DatasetConfig {
    /// Resolve the configured source.
    pub fn source(&self) -> DatasetSource {
        match self.path {
            Some(ref path) => DatasetSource::Local(PathBuf::from(path)),
            None => DatasetSource::Remote {
                url: self.url.clone(),
                cache_dir: PathBuf::from(&self.cache_dir),
                timeout_seconds: self.timeout_seconds,
                offline: self.offline,
            },
        }
    }
}

/// Chart output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Directory the PNG files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

/// What to do when a category the insights compare is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCategoryPolicy {
    /// Stop with an error (default)
    #[default]
    Fail,
    /// Leave out the affected sentences
    Skip,
}

/// Report settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub on_missing_category: MissingCategoryPolicy,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = Some(data.display().to_string());
        }
        if let Some(ref cache_dir) = args.cache_dir {
            self.dataset.cache_dir = cache_dir.display().to_string();
        }
        if let Some(timeout) = args.timeout {
            self.dataset.timeout_seconds = timeout;
        }
        if args.offline {
            self.dataset.offline = true;
        }

        if let Some(ref output_dir) = args.output_dir {
            self.charts.output_dir = output_dir.display().to_string();
        }

        if args.partial_report {
            self.report.on_missing_category = MissingCategoryPolicy::Skip;
        }
    }

    /// Directory the charts are written to.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.charts.output_dir)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
