//! HTTP fetching with retry and politeness decorators.
//!
//! # Architecture
//!
//! - [`Fetch`]: core trait, `GET(url) -> markup | FetchError`
//! - [`HttpFetcher`]: reqwest-backed implementation with a request timeout
//! - [`RetryFetch`]: decorator retrying transient failures with backoff
//! - [`PoliteFetch`]: decorator enforcing a minimum interval between requests
//!
//! The production stack is `PoliteFetch<RetryFetch<HttpFetcher>>`, so the
//! politeness interval applies once per logical request, and retries use
//! their own backoff.
//!
//! # Retry Strategy
//!
//! - Retries only errors for which [`FetchError::is_retryable`] holds
//! - Exponential backoff from the configured base delay, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::config::Config;
use crate::error::FetchError;
use rand::{Rng, rng};
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Something that can fetch a page's markup.
pub trait Fetch {
    /// Fetch `url` and return its body. Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Wrapper that retries transient failures of any [`Fetch`] implementation.
///
/// The delay before retry `n` is
/// ```text
/// delay = min(base_delay * 2^(n-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift);
        delay.min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch,
{
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            %url,
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + Duration::from_millis(jitter_ms);

                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Enforces a minimum interval between the end of one request and the
/// start of the next. Every request is counted, failed ones included.
pub struct PoliteFetch<T> {
    inner: T,
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl<T> PoliteFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_request: Mutex::new(None),
        }
    }

    fn remaining_wait(&self) -> Option<Duration> {
        let last = *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        last.and_then(|at| self.interval.checked_sub(at.elapsed()))
            .filter(|wait| !wait.is_zero())
    }

    fn mark_done(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(Instant::now());
    }
}

impl<T> fmt::Debug for PoliteFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoliteFetch")
            .field("interval", &self.interval)
            .finish()
    }
}

impl<T> Fetch for PoliteFetch<T>
where
    T: Fetch,
{
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Some(wait) = self.remaining_wait() {
            debug!(%url, ?wait, "Politeness delay");
            sleep(wait).await;
        }
        let result = self.inner.fetch(url).await;
        self.mark_done();
        result
    }
}

/// Build the production fetch stack from configuration.
pub fn build_fetcher(config: &Config) -> Result<PoliteFetch<RetryFetch<HttpFetcher>>, reqwest::Error> {
    let http = HttpFetcher::new(config.request_timeout(), &config.user_agent)?;
    let retrying = RetryFetch::new(http, config.max_retries, config.retry_base_delay());
    Ok(PoliteFetch::new(retrying, config.politeness_delay()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory fetcher. Unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        failures: HashMap<String, u16>,
        pub calls: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, markup: &str) -> Self {
            self.pages.insert(url.to_string(), markup.to_string());
            self
        }

        pub fn with_status(mut self, url: &str, status: u16) -> Self {
            self.failures.insert(url.to_string(), status);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.failures.get(url) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                });
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    /// Fails with 503 a fixed number of times, then succeeds.
    #[derive(Debug)]
    pub struct FlakyFetcher {
        pub failures_left: AtomicUsize,
        pub calls: AtomicUsize,
    }

    impl Fetch for FlakyFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                });
            }
            Ok("<html>ok</html>".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FlakyFetcher, StaticFetcher};
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryFetch::new(StaticFetcher::new(), 10, Duration::from_secs(1));
        assert_eq!(retry.backoff(1), Duration::from_secs(1));
        assert_eq!(retry.backoff(2), Duration::from_secs(2));
        assert_eq!(retry.backoff(3), Duration::from_secs(4));
        assert_eq!(retry.backoff(8), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = FlakyFetcher {
            failures_left: AtomicUsize::new(2),
            calls: AtomicUsize::new(0),
        };
        let retry = RetryFetch::new(flaky, 3, Duration::from_millis(1));
        let body = retry.fetch("https://sport.detik.com/a").await.unwrap();
        assert_eq!(body, "<html>ok</html>");
        assert_eq!(retry.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let flaky = FlakyFetcher {
            failures_left: AtomicUsize::new(10),
            calls: AtomicUsize::new(0),
        };
        let retry = RetryFetch::new(flaky, 1, Duration::from_millis(1));
        let err = retry.fetch("https://sport.detik.com/a").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(retry.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_skips_permanent_failures() {
        let fetcher = StaticFetcher::new().with_status("https://sport.detik.com/gone", 404);
        let retry = RetryFetch::new(fetcher, 5, Duration::from_millis(1));
        let err = retry.fetch("https://sport.detik.com/gone").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(retry.inner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_polite_fetch_spaces_requests() {
        let fetcher = StaticFetcher::new().with_page("https://sport.detik.com/a", "a");
        let polite = PoliteFetch::new(fetcher, Duration::from_millis(40));

        let t0 = Instant::now();
        for _ in 0..3 {
            polite.fetch("https://sport.detik.com/a").await.unwrap();
        }
        // two enforced gaps between three requests
        assert!(t0.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_polite_fetch_first_request_is_immediate() {
        let fetcher = StaticFetcher::new().with_page("https://sport.detik.com/a", "a");
        let polite = PoliteFetch::new(fetcher, Duration::from_secs(5));
        let t0 = Instant::now();
        polite.fetch("https://sport.detik.com/a").await.unwrap();
        assert!(t0.elapsed() < Duration::from_secs(1));
    }
}
