//! Configuration types for the BigBuy API client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`BigBuyConfig`]: The configuration struct holding all client settings
//! - [`BigBuyConfigBuilder`]: A builder for constructing [`BigBuyConfig`] instances
//! - [`AppKey`]: A validated app key newtype with masked debug output
//! - [`ApiMode`]: The environment (sandbox or production) to talk to
//! - [`Waiter`]: The wait capability used between rate-limit retries
//!
//! # Example
//!
//! ```rust
//! use bigbuy_api::{ApiMode, AppKey, BigBuyConfig};
//!
//! let config = BigBuyConfig::builder()
//!     .app_key(AppKey::new("my-app-key").unwrap())
//!     .mode(ApiMode::Production)
//!     .retry_on_rate_limit(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), "https://api.bigbuy.eu/rest");
//! ```

mod mode;
mod newtypes;

pub use mode::{ApiMode, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use newtypes::AppKey;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;

/// Future returned by a [`Waiter`].
pub type WaitFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An injectable asynchronous wait.
///
/// The client calls the waiter with the time left before a rate limit
/// resets. The default waiter is [`tokio::time::sleep`]; tests swap in a
/// recording waiter so that nothing actually sleeps.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::config::Waiter;
/// use std::time::Duration;
///
/// let waiter = Waiter::new(|duration: Duration| async move {
///     println!("would wait {duration:?}");
/// });
/// ```
#[derive(Clone)]
pub struct Waiter(Arc<dyn Fn(Duration) -> WaitFuture + Send + Sync>);

impl Waiter {
    /// Wraps an async wait function.
    #[must_use]
    pub fn new<F, Fut>(wait: F) -> Self
    where
        F: Fn(Duration) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Arc::new(move |duration| Box::pin(wait(duration))))
    }

    /// Returns a waiter backed by the Tokio timer.
    #[must_use]
    pub fn tokio() -> Self {
        Self::new(tokio::time::sleep)
    }

    /// Waits for the given duration.
    pub async fn wait(&self, duration: Duration) {
        (self.0)(duration).await;
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::tokio()
    }
}

impl fmt::Debug for Waiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Waiter(..)")
    }
}

/// Configuration for the BigBuy API client.
///
/// There is no global state: every client is built from its own
/// configuration value.
///
/// # Thread Safety
///
/// `BigBuyConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct BigBuyConfig {
    app_key: AppKey,
    mode: ApiMode,
    base_url: Option<String>,
    retry_on_rate_limit: bool,
    max_rate_limit_retries: u32,
    none_on_404: bool,
    none_on_empty: bool,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    waiter: Waiter,
}

impl BigBuyConfig {
    /// Creates a new builder for constructing a `BigBuyConfig`.
    #[must_use]
    pub fn builder() -> BigBuyConfigBuilder {
        BigBuyConfigBuilder::new()
    }

    /// Returns the app key.
    #[must_use]
    pub const fn app_key(&self) -> &AppKey {
        &self.app_key
    }

    /// Returns the API mode.
    #[must_use]
    pub const fn mode(&self) -> ApiMode {
        self.mode
    }

    /// Returns the REST base URL: the configured override, or the URL
    /// selected by the mode.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.mode.base_url())
    }

    /// Returns whether rate-limited requests are retried.
    #[must_use]
    pub const fn retry_on_rate_limit(&self) -> bool {
        self.retry_on_rate_limit
    }

    /// Returns the maximum number of rate-limit retries per request.
    #[must_use]
    pub const fn max_rate_limit_retries(&self) -> u32 {
        self.max_rate_limit_retries
    }

    /// Returns whether a 404 is reported as `None` by the REST helpers.
    #[must_use]
    pub const fn none_on_404(&self) -> bool {
        self.none_on_404
    }

    /// Returns whether an empty success body is reported as `None`.
    #[must_use]
    pub const fn none_on_empty(&self) -> bool {
        self.none_on_empty
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the overall request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the waiter used between rate-limit retries.
    #[must_use]
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }
}

// Verify BigBuyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BigBuyConfig>();
};

/// Builder for constructing [`BigBuyConfig`] instances.
///
/// The only required field is `app_key`.
///
/// # Defaults
///
/// - `mode`: [`ApiMode::Sandbox`]
/// - `base_url`: the URL of the mode
/// - `retry_on_rate_limit`: `false`
/// - `max_rate_limit_retries`: `1`
/// - `none_on_404`: `false`
/// - `none_on_empty`: `true`
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None`
/// - `waiter`: [`Waiter::tokio`]
#[derive(Debug, Default)]
pub struct BigBuyConfigBuilder {
    app_key: Option<AppKey>,
    mode: Option<ApiMode>,
    base_url: Option<String>,
    retry_on_rate_limit: Option<bool>,
    max_rate_limit_retries: Option<u32>,
    none_on_404: Option<bool>,
    none_on_empty: Option<bool>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    waiter: Option<Waiter>,
}

impl BigBuyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the app key (required).
    #[must_use]
    pub fn app_key(mut self, key: AppKey) -> Self {
        self.app_key = Some(key);
        self
    }

    /// Sets the API mode.
    #[must_use]
    pub const fn mode(mut self, mode: ApiMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Overrides the REST base URL, e.g. to go through a proxy.
    ///
    /// A trailing `/` is removed.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    /// Enables or disables retrying rate-limited requests.
    #[must_use]
    pub const fn retry_on_rate_limit(mut self, retry: bool) -> Self {
        self.retry_on_rate_limit = Some(retry);
        self
    }

    /// Sets how many times a single request may be retried after a rate limit.
    #[must_use]
    pub const fn max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = Some(retries);
        self
    }

    /// Reports 404 responses as `None` in the REST helpers.
    #[must_use]
    pub const fn none_on_404(mut self, enabled: bool) -> Self {
        self.none_on_404 = Some(enabled);
        self
    }

    /// Reports empty success bodies as `None` in the REST helpers.
    #[must_use]
    pub const fn none_on_empty(mut self, enabled: bool) -> Self {
        self.none_on_empty = Some(enabled);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the overall timeout applied to each HTTP request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the waiter used between rate-limit retries.
    #[must_use]
    pub fn waiter(mut self, waiter: Waiter) -> Self {
        self.waiter = Some(waiter);
        self
    }

    /// Builds the [`BigBuyConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `app_key` is not set,
    /// and [`ConfigError::ZeroRetryBudget`] if retries are enabled with a
    /// budget of zero.
    pub fn build(self) -> Result<BigBuyConfig, ConfigError> {
        let app_key = self
            .app_key
            .ok_or(ConfigError::MissingRequiredField { field: "app_key" })?;

        let retry_on_rate_limit = self.retry_on_rate_limit.unwrap_or(false);
        let max_rate_limit_retries = self.max_rate_limit_retries.unwrap_or(1);
        if retry_on_rate_limit && max_rate_limit_retries == 0 {
            return Err(ConfigError::ZeroRetryBudget);
        }

        Ok(BigBuyConfig {
            app_key,
            mode: self.mode.unwrap_or_default(),
            base_url: self.base_url,
            retry_on_rate_limit,
            max_rate_limit_retries,
            none_on_404: self.none_on_404.unwrap_or(false),
            none_on_empty: self.none_on_empty.unwrap_or(true),
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            waiter: self.waiter.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_key() -> AppKey {
        AppKey::new("top_secret_app_key").unwrap()
    }

    #[test]
    fn test_builder_requires_app_key() {
        let result = BigBuyConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "app_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = BigBuyConfig::builder().app_key(app_key()).build().unwrap();

        assert_eq!(config.mode(), ApiMode::Sandbox);
        assert_eq!(config.base_url(), "https://api.sandbox.bigbuy.eu/rest");
        assert!(!config.retry_on_rate_limit());
        assert_eq!(config.max_rate_limit_retries(), 1);
        assert!(!config.none_on_404());
        assert!(config.none_on_empty());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_builder_production_mode() {
        let config = BigBuyConfig::builder()
            .app_key(app_key())
            .mode(ApiMode::Production)
            .build()
            .unwrap();

        assert_eq!(config.base_url(), "https://api.bigbuy.eu/rest");
    }

    #[test]
    fn test_base_url_override_wins_over_mode() {
        let config = BigBuyConfig::builder()
            .app_key(app_key())
            .mode(ApiMode::Production)
            .base_url("https://proxy.example.com/rest/")
            .build()
            .unwrap();

        assert_eq!(config.mode(), ApiMode::Production);
        assert_eq!(config.base_url(), "https://proxy.example.com/rest");
    }

    #[test]
    fn test_builder_rejects_zero_retry_budget() {
        let result = BigBuyConfig::builder()
            .app_key(app_key())
            .retry_on_rate_limit(true)
            .max_rate_limit_retries(0)
            .build();

        assert!(matches!(result, Err(ConfigError::ZeroRetryBudget)));
    }

    #[test]
    fn test_zero_retry_budget_allowed_without_retries() {
        let config = BigBuyConfig::builder()
            .app_key(app_key())
            .max_rate_limit_retries(0)
            .build()
            .unwrap();

        assert_eq!(config.max_rate_limit_retries(), 0);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = BigBuyConfig::builder()
            .app_key(app_key())
            .mode(ApiMode::Production)
            .retry_on_rate_limit(true)
            .max_rate_limit_retries(3)
            .none_on_404(true)
            .none_on_empty(false)
            .user_agent_prefix("MyShop/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        assert!(config.retry_on_rate_limit());
        assert_eq!(config.max_rate_limit_retries(), 3);
        assert!(config.none_on_404());
        assert!(!config.none_on_empty());
        assert_eq!(config.user_agent_prefix(), Some("MyShop/1.0"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_debug_masks_app_key() {
        let config = BigBuyConfig::builder().app_key(app_key()).build().unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("BigBuyConfig"));
        assert!(debug_str.contains("top_secret…"));
        assert!(!debug_str.contains("top_secret_app_key"));
    }

    #[tokio::test]
    async fn test_custom_waiter_is_called() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let waiter = Waiter::new(move |duration| {
            recorder.lock().unwrap().push(duration);
            async {}
        });

        waiter.wait(Duration::from_millis(5)).await;

        assert_eq!(*seen.lock().unwrap(), vec![Duration::from_millis(5)]);
    }
}
