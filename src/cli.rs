//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// titanic-eda - exploratory analysis of the Titanic passenger dataset
///
/// Loads the passenger table, cleans it, prints summary tables, writes five
/// PNG charts and finishes with the key findings.
///
/// Examples:
///   titanic-eda
///   titanic-eda --data ./titanic.csv --output-dir charts
///   titanic-eda --offline --cache-dir ~/.cache/seaborn-data
///   titanic-eda --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Local CSV file to analyze instead of the reference dataset
    ///
    /// Must have the same columns as the seaborn titanic dataset.
    #[arg(short, long, value_name = "FILE", env = "TITANIC_EDA_DATA")]
    pub data: Option<PathBuf>,

    /// Directory the chart images are written to
    ///
    /// Default: from config or the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding the cached reference dataset
    #[arg(long, value_name = "DIR", env = "TITANIC_EDA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Never download; fail if the dataset is not cached
    #[arg(long)]
    pub offline: bool,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .titanic-eda.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave out insights whose categories are missing instead of failing
    #[arg(long)]
    pub partial_report: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .titanic-eda.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
        }

        if let Some(ref output_dir) = self.output_dir {
            if output_dir.exists() && !output_dir.is_dir() {
                return Err(format!(
                    "Output path is not a directory: {}",
                    output_dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
