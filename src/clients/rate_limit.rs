//! Rate-limit bookkeeping for the BigBuy API.
//!
//! BigBuy signals throttling with a non-2xx response whose body is exactly
//! [`RATE_LIMIT_RESPONSE_TEXT`] and whose `X-Ratelimit-Reset` header holds
//! the Unix timestamp at which requests are accepted again.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clients::http_response::HttpResponse;
use crate::config::Waiter;

/// Body text BigBuy returns when the rate limit is exceeded.
pub const RATE_LIMIT_RESPONSE_TEXT: &str = "You exceeded the rate limit";

/// Extra delay added on top of the computed wait, so the retry lands
/// after the reset rather than exactly on it.
pub const DEFAULT_ADDITIONAL_DELAY: Duration = Duration::from_millis(10);

/// A rate limit reported by the API, identified by its reset time.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::{HttpResponse, RateLimit};
///
/// let response = HttpResponse::new(429, Default::default(), "You exceeded the rate limit")
///     .with_header("X-Ratelimit-Reset", "1700000000");
///
/// let rate_limit = RateLimit::from_response(&response).unwrap();
/// assert_eq!(rate_limit.reset_time().timestamp(), 1_700_000_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    reset_time: DateTime<Utc>,
}

impl RateLimit {
    /// Creates a rate limit that resets at the given instant.
    #[must_use]
    pub const fn new(reset_time: DateTime<Utc>) -> Self {
        Self { reset_time }
    }

    /// Extracts a rate limit from a response.
    ///
    /// Returns `None` unless the response is a failure, its body is exactly
    /// the rate-limit sentinel, and the reset header is a non-negative
    /// integer timestamp.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        if response.is_ok() || response.text != RATE_LIMIT_RESPONSE_TEXT {
            return None;
        }

        let reset = response.rate_limit_reset()?;
        if reset.is_empty() || !reset.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let timestamp: i64 = reset.parse().ok()?;
        DateTime::from_timestamp(timestamp, 0).map(Self::new)
    }

    /// Returns the instant at which the rate limit resets.
    #[must_use]
    pub const fn reset_time(&self) -> DateTime<Utc> {
        self.reset_time
    }

    /// Returns the time left until the reset, measured from `now` (or the
    /// current UTC time).
    ///
    /// Returns `None` once the reset time has been reached.
    #[must_use]
    pub fn reset_timedelta(&self, now: Option<DateTime<Utc>>) -> Option<Duration> {
        let now = now.unwrap_or_else(Utc::now);
        (self.reset_time - now)
            .to_std()
            .ok()
            .filter(|delta| !delta.is_zero())
    }

    /// Blocks through `wait_function` until the rate limit has expired.
    ///
    /// The wait function receives the remaining time plus
    /// `additional_delay`. Returns `true` if a wait happened, `false` if the
    /// limit had already expired.
    pub fn wait_until_expiration<F>(&self, wait_function: F, additional_delay: Duration) -> bool
    where
        F: FnOnce(Duration),
    {
        match self.reset_timedelta(None) {
            Some(delta) => {
                wait_function(delta + additional_delay);
                true
            }
            None => false,
        }
    }

    /// Async counterpart of [`RateLimit::wait_until_expiration`].
    pub async fn wait_until_expiration_with(
        &self,
        waiter: &Waiter,
        additional_delay: Duration,
    ) -> bool {
        match self.reset_timedelta(None) {
            Some(delta) => {
                waiter.wait(delta + additional_delay).await;
                true
            }
            None => false,
        }
    }
}
