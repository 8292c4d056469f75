//! HTTP client with rate limiting for stetoskop.info
//!
//! This module provides a rate-limited HTTP client that spaces requests out
//! to respect the portal's server load and implements retry logic with
//! exponential backoff.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{MkbError, Result};

/// Base URL of the portal hosting the MKB-10 catalogue
pub const BASE_URL: &str = "https://www.stetoskop.info";

/// Default User-Agent identifying the scraper
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; mkb-scraper/1.0; +https://www.batut.org.rs)";

/// Default Accept-Language header for Serbian content
const DEFAULT_ACCEPT_LANGUAGE: &str = "sr-RS,sr;q=0.9,en;q=0.8";

/// Default pause between consecutive requests, in seconds
pub const DEFAULT_DELAY_SECS: f64 = 0.2;

/// Upper bound on the configurable delay between requests, in seconds
const MAX_DELAY_SECS: f64 = 3600.0;

/// Default request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// so the portal never sees more than one request per delay window.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified delay between requests
    ///
    /// Negative or non-finite delays are treated as zero; delays longer
    /// than one hour are clamped down to one hour.
    ///
    /// # Arguments
    /// * `delay_secs` - Seconds to wait between consecutive requests
    ///
    /// # Example
    /// ```
    /// use mkb_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(0.2); // 200ms between requests
    /// ```
    pub fn new(delay_secs: f64) -> Self {
        let delay_secs = if delay_secs.is_finite() {
            delay_secs.clamp(0.0, MAX_DELAY_SECS)
        } else {
            0.0
        };
        let min_interval = Duration::from_secs_f64(delay_secs);
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(
                Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now),
            )),
        }
    }

    /// Acquire permission to make a request
    ///
    /// This method will wait if necessary to ensure the minimum interval
    /// between requests is respected.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the portal HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the portal (default: `https://www.stetoskop.info`)
    pub base_url: String,
    /// Seconds to pause between consecutive requests (default: 0.2)
    pub delay_secs: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            delay_secs: DEFAULT_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for stetoskop.info with rate limiting and retry logic
///
/// This client automatically:
/// - Spaces requests out to avoid server overload
/// - Retries on transient errors (429, 5xx) with exponential backoff
/// - Sets appropriate headers for Serbian content
pub struct MkbClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
    /// Base URL requests are made against
    base_url: String,
}

impl MkbClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
                );
                headers
            })
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.delay_secs);
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            rate_limiter,
            base_url,
        })
    }

    /// Get the base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch HTML content from a portal path
    ///
    /// This method handles rate limiting and retries automatically.
    ///
    /// # Arguments
    /// * `path` - Relative path on the portal (e.g., "/medjunarodna-klasifikacija-bolesti")
    ///
    /// # Returns
    /// The HTML content as a string
    ///
    /// # Errors
    /// - `MkbError::HttpError` - Network or HTTP error after all retries
    /// - `MkbError::RateLimited` - Server returned 429 after all retries
    /// - `MkbError::NotFound` - Server returned 404
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        self.fetch_with_retry(&url, 0).await
    }

    /// Internal method to fetch with retry logic
    fn fetch_with_retry<'a>(
        &'a self,
        url: &'a str,
        attempt: u32,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            // Wait for rate limiter before making request
            self.rate_limiter.acquire().await;

            info!("Fetching {}", url);
            let response = self.client.get(url).send().await?;
            let status = response.status();

            // Handle different status codes
            if status.is_success() {
                return Ok(response.text().await?);
            }

            // Handle 404 - Not Found (no retry)
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(MkbError::NotFound(url.to_string()));
            }

            // Handle 429 - Rate Limited
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if attempt < MAX_RETRIES {
                    let delay = self.calculate_backoff_delay(attempt);
                    warn!("Rate limited on {}, retrying in {:?}", url, delay);
                    sleep(delay).await;
                    return self.fetch_with_retry(url, attempt + 1).await;
                }
                return Err(MkbError::RateLimited);
            }

            // Handle 5xx - Server errors
            if status.is_server_error() {
                if attempt < MAX_RETRIES {
                    let delay = self.calculate_backoff_delay(attempt);
                    warn!("Server error {} on {}, retrying in {:?}", status, url, delay);
                    sleep(delay).await;
                    return self.fetch_with_retry(url, attempt + 1).await;
                }
                return Err(MkbError::HttpError(
                    response.error_for_status().unwrap_err(),
                ));
            }

            // Other errors - convert to HttpError
            Err(MkbError::HttpError(
                response.error_for_status().unwrap_err(),
            ))
        })
    }

    /// Calculate exponential backoff delay for retry
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: 1s, 2s, 4s, ...
        let delay_ms = BASE_RETRY_DELAY_MS * 2u64.pow(attempt);
        Duration::from_millis(delay_ms)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(0.2);
        assert_eq!(limiter.min_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_rate_limiter_different_delays() {
        let limiter = RateLimiter::new(1.0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(1));

        let limiter = RateLimiter::new(0.0);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_clamps_negative_delay() {
        let limiter = RateLimiter::new(-3.5);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_clamps_non_finite_delay() {
        let limiter = RateLimiter::new(f64::INFINITY);
        assert_eq!(limiter.min_interval(), Duration::ZERO);

        let limiter = RateLimiter::new(f64::NAN);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_clamps_oversized_delay() {
        // 2e19 seconds is finite but past what Duration can represent
        let limiter = RateLimiter::new(2.0e19);
        assert_eq!(limiter.min_interval(), Duration::from_secs(3600));

        let limiter = RateLimiter::new(f64::MAX);
        assert_eq!(limiter.min_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.stetoskop.info");
        assert_eq!(config.delay_secs, 0.2);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        let client = MkbClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            base_url: "http://localhost:8080".to_string(),
            delay_secs: 1.0,
            timeout_secs: 60,
        };
        let client = MkbClient::with_config(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.rate_limiter().min_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = ClientConfig {
            base_url: "https://www.stetoskop.info/".to_string(),
            ..ClientConfig::default()
        };
        let client = MkbClient::with_config(config).unwrap();
        assert_eq!(client.base_url(), "https://www.stetoskop.info");
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = MkbClient::new().unwrap();

        assert_eq!(client.calculate_backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(client.calculate_backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(client.calculate_backoff_delay(2), Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(0.1); // 100ms between requests

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        // Second acquire should wait at least 100ms
        assert!(elapsed >= Duration::from_millis(100));
    }
}
