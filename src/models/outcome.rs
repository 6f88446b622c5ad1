//! Result of a single crawl run.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};

/// URLs of requests that failed during a run.
///
/// Append-only; read once when the run is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailedRequests {
    urls: Vec<String>,
}

impl FailedRequests {
    /// Record a failed request and log it.
    pub fn record(&mut self, error: &AppError) {
        match error.request_url() {
            Some(url) => {
                log::warn!("Failed to retrieve data: {error}");
                self.urls.push(url.to_string());
            }
            None => log::error!("Request failed without a URL: {error}"),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

/// The crawl's entry point could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFailure {
    pub url: String,
    pub message: String,
}

impl From<&AppError> for RootFailure {
    fn from(error: &AppError) -> Self {
        Self {
            url: error.request_url().unwrap_or_default().to_string(),
            message: error.to_string(),
        }
    }
}

/// Everything a crawl run produced.
#[derive(Debug, Clone)]
pub struct CrawlOutcome<T> {
    /// Assembled dataset
    pub output: T,

    /// Number of concepts visited
    pub visited: usize,

    /// Requests that failed, in the order they failed
    pub failed_urls: Vec<String>,

    /// Set when the root fetch failed and the dataset is empty because of it
    pub root_failure: Option<RootFailure>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl<T> CrawlOutcome<T> {
    /// Turn a root failure into an error for callers that prefer to abort.
    pub fn ensure_root(&self) -> Result<()> {
        match &self.root_failure {
            Some(failure) => Err(AppError::RootFetchFailed {
                url: failure.url.clone(),
                message: failure.message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Replace the output, keeping the run's bookkeeping.
    pub fn map_output<U>(self, f: impl FnOnce(T) -> U) -> CrawlOutcome<U> {
        CrawlOutcome {
            output: f(self.output),
            visited: self.visited,
            failed_urls: self.failed_urls,
            root_failure: self.root_failure,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    pub fn try_map_output<U, E>(
        self,
        f: impl FnOnce(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<CrawlOutcome<U>, E> {
        Ok(CrawlOutcome {
            output: f(self.output)?,
            visited: self.visited,
            failed_urls: self.failed_urls,
            root_failure: self.root_failure,
            started_at: self.started_at,
            finished_at: self.finished_at,
        })
    }

    /// Wall-clock duration of the run in seconds.
    pub fn elapsed_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
