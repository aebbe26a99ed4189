//! HTTP fetcher for the NITH result portal
//!
//! Submits one form post per roll number against the per-year portal
//! endpoint, with:
//! - User-Agent rotation from a seedable RNG
//! - Rate limiting with governor
//! - Retry with exponential backoff for 5xx responses
//!
//! The public surface never fails: transport errors are logged and
//! converted to "no content" so a batch can keep moving.

use crate::config::FetchConfig;
use crate::crawler::headers::{build_portal_headers, USER_AGENTS};
use crate::error::FetchError;
use crate::roll;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Form field the roll number is submitted under
const ROLL_FIELD: &str = "RollNumber";

/// Fixed semester selector the portal expects alongside the roll number
const SEM_FIELD: (&str, &str) = ("x_vSemID", "1");

/// Result portal fetcher
pub struct ResultFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Maximum number of attempts for 5xx responses
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,

    /// Portal base URL (overridable for mock servers)
    base_url: String,

    /// Seedable source for User-Agent selection
    rng: Mutex<ChaCha8Rng>,
}

impl ResultFetcher {
    /// Create a new fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Create a fetcher with a fixed RNG seed
    ///
    /// Makes User-Agent selection deterministic for tests and reproducible
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_seed(config: &FetchConfig, seed: u64) -> Result<Self, FetchError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: &FetchConfig, rng: ChaCha8Rng) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(config.requests_per_second)
            .unwrap_or_else(|| NonZeroU32::new(1).expect("1 is non-zero"));
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            max_retries: config.max_retries.max(1),
            base_delay_ms: config.base_delay_ms,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rng: Mutex::new(rng),
        })
    }

    /// Fetch the result page for one roll number
    ///
    /// Returns the raw HTML on success, or `None` on any failure: transport
    /// errors, non-200 statuses, exhausted retries, and empty bodies. The
    /// cause is logged for observability only; nothing propagates to the
    /// caller.
    pub async fn fetch_result(&self, roll: &str) -> Option<String> {
        self.rate_limiter.until_ready().await;

        match self.fetch_with_retry(roll).await {
            Ok(body) if body.trim().is_empty() => {
                debug!(roll = %roll, "Empty result page body");
                None
            }
            Ok(body) => Some(body),
            Err(err) => {
                warn!(roll = %roll, error = %err, "Failed to fetch result page");
                None
            }
        }
    }

    /// Fetch with exponential backoff retry logic
    async fn fetch_with_retry(&self, roll: &str) -> Result<String, FetchError> {
        let (submit_url, referer) = self.endpoints_for(roll)?;
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 2);
                debug!(roll = %roll, attempt = attempt, delay_ms = delay, "Retrying fetch");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let headers = build_portal_headers(self.random_user_agent(), &referer);
            let form = [(ROLL_FIELD, roll), SEM_FIELD];

            match self
                .client
                .post(&submit_url)
                .headers(headers)
                .form(&form)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.text().await?);
                    } else if Self::should_retry(status.as_u16()) {
                        last_error = Some(FetchError::ServerError(status.as_u16()));
                        continue;
                    } else {
                        // 4xx and other non-retryable statuses are terminal
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) => {
                    // Timeouts and connection failures are not retried at
                    // this layer
                    if e.is_timeout() {
                        return Err(FetchError::Timeout);
                    }
                    return Err(FetchError::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::MaxRetriesExceeded))
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Only the portal's transient 5xx responses are retried; 4xx means the
    /// page simply is not there.
    fn should_retry(status: u16) -> bool {
        matches!(status, 500 | 502 | 503 | 504)
    }

    /// Derive (submit URL, referer) from the roll's embedded year
    ///
    /// The portal partitions result pages by enrollment year into
    /// `scheme{YY}` URL namespaces.
    fn endpoints_for(&self, roll: &str) -> Result<(String, String), FetchError> {
        let year = roll::year_of(roll).ok_or_else(|| FetchError::InvalidRoll(roll.to_string()))?;
        let referer = format!("{}/scheme{year}/studentresult/", self.base_url);
        let submit_url = format!("{referer}result.asp");
        Ok((submit_url, referer))
    }

    /// Get a random user agent from the pool
    fn random_user_agent(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        USER_AGENTS.choose(&mut *rng).unwrap_or(&USER_AGENTS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FetchConfig {
        FetchConfig {
            base_url: "http://results.nith.ac.in".to_string(),
            request_timeout_secs: 15,
            max_retries: 5,
            base_delay_ms: 500,
            requests_per_second: 10,
        }
    }

    #[test]
    fn test_should_retry() {
        assert!(ResultFetcher::should_retry(500));
        assert!(ResultFetcher::should_retry(502));
        assert!(ResultFetcher::should_retry(503));
        assert!(ResultFetcher::should_retry(504));

        assert!(!ResultFetcher::should_retry(200));
        assert!(!ResultFetcher::should_retry(400));
        assert!(!ResultFetcher::should_retry(404));
        assert!(!ResultFetcher::should_retry(429));
    }

    #[test]
    fn test_endpoint_partitioned_by_year() {
        let fetcher = ResultFetcher::new(&test_config()).unwrap();

        let (submit, referer) = fetcher.endpoints_for("21BCS005").unwrap();
        assert_eq!(
            submit,
            "http://results.nith.ac.in/scheme21/studentresult/result.asp"
        );
        assert_eq!(referer, "http://results.nith.ac.in/scheme21/studentresult/");

        let (submit, _) = fetcher.endpoints_for("23BEE001").unwrap();
        assert!(submit.contains("/scheme23/"));
    }

    #[test]
    fn test_endpoint_rejects_short_roll() {
        let fetcher = ResultFetcher::new(&test_config()).unwrap();
        assert!(matches!(
            fetcher.endpoints_for("9"),
            Err(FetchError::InvalidRoll(_))
        ));
    }

    #[test]
    fn test_trailing_slash_stripped_from_base_url() {
        let mut config = test_config();
        config.base_url = "http://localhost:8080/".to_string();
        let fetcher = ResultFetcher::new(&config).unwrap();

        let (submit, _) = fetcher.endpoints_for("22DCS010").unwrap();
        assert_eq!(submit, "http://localhost:8080/scheme22/studentresult/result.asp");
    }

    #[test]
    fn test_user_agent_rotation_stays_in_pool() {
        let fetcher = ResultFetcher::new(&test_config()).unwrap();

        let mut agents = std::collections::HashSet::new();
        for _ in 0..100 {
            let agent = fetcher.random_user_agent();
            assert!(USER_AGENTS.contains(&agent));
            agents.insert(agent);
        }
        assert!(agents.len() > 1, "User agents should rotate");
    }

    #[test]
    fn test_seeded_rotation_is_deterministic() {
        let a = ResultFetcher::with_seed(&test_config(), 42).unwrap();
        let b = ResultFetcher::with_seed(&test_config(), 42).unwrap();

        let picks_a: Vec<_> = (0..20).map(|_| a.random_user_agent()).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.random_user_agent()).collect();
        assert_eq!(picks_a, picks_b);
    }
}
