//! Error types for the ingestion pipeline.
//!
//! Three families of failure exist, and they are handled very differently:
//!
//! - [`FetchError`]: a single category page or article could not be fetched.
//!   Always recoverable; the caller logs it and moves on to the next URL.
//! - [`StoreError`]: the article store or corpus file could not be read or
//!   written. A read failure on a malformed store aborts the run so the file
//!   is never overwritten with a partial view of the data.
//! - [`PipelineError`]: fatal startup conditions such as a missing input file
//!   or an invalid selector in the configuration. Raised before any work.
//!
//! A field that cannot be located on an article page is *not* an error. The
//! extractor logs the gap and stores the `"N/A"` sentinel instead.

use std::path::PathBuf;
use thiserror::Error;

/// A per-URL fetch failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed reading body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Network failures, timeouts, `429` and `5xx` are retryable. Any other
    /// status (404, 403, ...) is a property of the URL and is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { .. } | FetchError::Body { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Failure reading or writing a persisted JSON file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not move temporary file into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Fatal pipeline errors. None of these are raised once work has begun,
/// except [`PipelineError::Store`] at the final persist.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required local file or directory is absent.
    #[error("required {what} not found: {path}")]
    MissingResource { what: &'static str, path: PathBuf },

    /// The configuration file exists but could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A CSS selector in the configuration does not parse.
    #[error("invalid selector {selector:?} for {rule}: {reason}")]
    InvalidSelector {
        rule: String,
        selector: String,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryability() {
        let not_found = FetchError::Status {
            url: "https://sport.detik.com/x".into(),
            status: 404,
        };
        let throttled = FetchError::Status {
            url: "https://sport.detik.com/x".into(),
            status: 429,
        };
        let unavailable = FetchError::Status {
            url: "https://sport.detik.com/x".into(),
            status: 503,
        };

        assert!(!not_found.is_retryable());
        assert!(throttled.is_retryable());
        assert!(unavailable.is_retryable());
        assert_eq!(not_found.url(), "https://sport.detik.com/x");
    }

    #[test]
    fn test_missing_resource_message_names_path() {
        let err = PipelineError::MissingResource {
            what: "article store",
            path: PathBuf::from("data/articles.json"),
        };
        assert_eq!(
            err.to_string(),
            "required article store not found: data/articles.json"
        );
    }
}
