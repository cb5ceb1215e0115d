//! Dataset download into the local cache.
//!
//! The reference CSV is fetched once over HTTP and kept under the cache
//! directory; later runs read the cached copy.

use crate::dataset::LoadError;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Options for downloading the dataset.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while downloading.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Download `url` and store the body at `target`.
///
/// The body is written to a temporary file in the target directory and then
/// renamed, so an interrupted download never leaves a truncated cache entry.
pub fn download_to(url: &str, target: &Path, options: &FetchOptions) -> Result<u64, LoadError> {
    info!("Downloading dataset from {}", url);

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = fetch_into(url, dir, target, options.timeout_seconds);
    finish_spinner(spinner.as_ref(), &result);

    let written = result?;
    info!("Cached dataset at: {}", target.display());
    Ok(written)
}

/// Stop the spinner: keep a completion line on success, clear it on error.
fn finish_spinner<T>(spinner: Option<&ProgressBar>, result: &Result<T, LoadError>) {
    if let Some(pb) = spinner {
        match result {
            Ok(_) => pb.finish_with_message("Download complete"),
            Err(_) => pb.finish_and_clear(),
        }
    }
}

fn fetch_into(url: &str, dir: &Path, target: &Path, timeout_seconds: u64) -> Result<u64, LoadError> {
    let http_error = |source: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(http_error)?;
    debug!("Received {} bytes", body.len());

    let io_error = |source: std::io::Error| LoadError::Io {
        path: target.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(&body).map_err(io_error)?;
    file.persist(target).map_err(|e| io_error(e.error))?;

    Ok(body.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_options_default() {
        let opts = FetchOptions::default();
        assert_eq!(opts.timeout_seconds, 30);
        assert!(opts.show_progress);
    }

    #[test]
    fn test_unreachable_host_is_http_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("titanic.csv");
        let options = FetchOptions {
            timeout_seconds: 2,
            show_progress: false,
        };

        let result = download_to("http://127.0.0.1:9/titanic.csv", &target, &options);

        assert!(matches!(result, Err(LoadError::Http { .. })));
        assert!(!target.exists());
    }

    #[test]
    fn test_spinner_finished_on_error() {
        let pb = ProgressBar::hidden();
        let result: Result<u64, LoadError> = Err(LoadError::Status {
            url: "http://example.invalid".to_string(),
            status: 500,
        });

        finish_spinner(Some(&pb), &result);
        assert!(pb.is_finished());
    }

    #[test]
    fn test_unreachable_host_with_spinner() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("titanic.csv");
        let options = FetchOptions {
            timeout_seconds: 2,
            show_progress: true,
        };

        let result = download_to("http://127.0.0.1:9/titanic.csv", &target, &options);
        assert!(matches!(result, Err(LoadError::Http { .. })));
    }
}
