//! HTTP client for BigBuy API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the BigBuy API. Every response is classified before it is
//! returned, and rate-limited requests are optionally retried.

use std::collections::HashMap;

use crate::clients::api_error::ApiError;
use crate::clients::classify::classify_response;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::DEFAULT_ADDITIONAL_DELAY;
use crate::config::{AppKey, BigBuyConfig, Waiter};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the BigBuy API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent and the bearer token
/// - Classification of every response into success or an [`ApiError`]
/// - Optional waiting and retrying when the rate limit is exceeded
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use bigbuy_api::{AppKey, BigBuyConfig, HttpClient, HttpMethod, HttpRequest};
///
/// let config = BigBuyConfig::builder()
///     .app_key(AppKey::new("my-app-key").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config);
///
/// let request = HttpRequest::builder(HttpMethod::Get, "catalog/languages")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL (e.g., `https://api.sandbox.bigbuy.eu/rest`).
    base_url: String,
    /// Bearer token sent with every request.
    app_key: AppKey,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Retries left per request after a rate limit, 0 when disabled.
    rate_limit_retries: u32,
    waiter: Waiter,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &BigBuyConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}BigBuy API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        let rate_limit_retries = if config.retry_on_rate_limit() {
            config.max_rate_limit_retries()
        } else {
            0
        };

        Self {
            client,
            base_url: config.base_url().to_string(),
            app_key: config.app_key().clone(),
            default_headers,
            rate_limit_retries,
            waiter: config.waiter().clone(),
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    ///
    /// The `Authorization` header is added per request and is not listed.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full URL of an endpoint.
    ///
    /// Relative endpoints become `{base_url}/{endpoint}.json`; absolute
    /// `https://` URLs are used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InsecureEndpoint`] for `http://` URLs.
    pub fn url_for(&self, endpoint: &str) -> Result<String, HttpError> {
        if endpoint.starts_with("https://") {
            return Ok(endpoint.to_string());
        }
        if endpoint.starts_with("http://") {
            return Err(HttpError::InsecureEndpoint {
                url: endpoint.to_string(),
            });
        }
        Ok(format!("{}/{}.json", self.base_url, endpoint))
    }

    /// Sends an HTTP request to the BigBuy API.
    ///
    /// When rate-limit retries are enabled and the API reports a rate limit
    /// with a reset time, the client waits until the reset and sends the same
    /// request again, up to the configured number of times.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The endpoint uses plain HTTP (`InsecureEndpoint`)
    /// - Network error occurs (`Network`)
    /// - The response is classified as a failure (`Api`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        let url = self.url_for(&request.endpoint)?;

        let mut retries_left = self.rate_limit_retries;
        loop {
            let response = self.send(&request, &url).await?;

            let error = match classify_response(&response) {
                Ok(()) => return Ok(response),
                Err(error) => error,
            };

            let rate_limit = match &error {
                ApiError::RateLimit {
                    rate_limit: Some(rate_limit),
                    ..
                } => Some(*rate_limit),
                _ => None,
            };
            let Some(rate_limit) = rate_limit else {
                return Err(error.into());
            };

            if retries_left == 0 {
                if self.rate_limit_retries > 0 {
                    tracing::warn!(
                        "Rate limit retries exhausted for {} {}",
                        request.http_method,
                        request.endpoint
                    );
                }
                return Err(error.into());
            }

            retries_left -= 1;
            tracing::warn!(
                "Rate limit exceeded for {} {}; waiting until {} ({} retries left)",
                request.http_method,
                request.endpoint,
                rate_limit.reset_time(),
                retries_left
            );
            rate_limit
                .wait_until_expiration_with(&self.waiter, DEFAULT_ADDITIONAL_DELAY)
                .await;
        }
    }

    /// Sends a request once and captures the raw response.
    async fn send(&self, request: &HttpRequest, url: &str) -> Result<HttpResponse, HttpError> {
        tracing::debug!("Sending {} request to {}", request.http_method, url);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.bearer_auth(self.app_key.as_ref());

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let text = res.text().await?;

        tracing::debug!("Received {} from {}", code, url);
        Ok(HttpResponse::new(code, headers, text))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppKey;

    fn config() -> BigBuyConfig {
        BigBuyConfig::builder()
            .app_key(AppKey::new("test-app-key").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let client = HttpClient::new(&config());
        assert_eq!(client.base_url(), "https://api.sandbox.bigbuy.eu/rest");
    }

    #[test]
    fn test_url_for_relative_endpoint() {
        let client = HttpClient::new(&config());
        assert_eq!(
            client.url_for("catalog/languages").unwrap(),
            "https://api.sandbox.bigbuy.eu/rest/catalog/languages.json"
        );
    }

    #[test]
    fn test_url_for_absolute_https_url() {
        let client = HttpClient::new(&config());
        let url = "https://files.bigbuy.eu/export.csv";
        assert_eq!(client.url_for(url).unwrap(), url);
    }

    #[test]
    fn test_url_for_rejects_plain_http() {
        let client = HttpClient::new(&config());
        let result = client.url_for("http://api.bigbuy.eu/rest/catalog/languages.json");

        assert!(matches!(
            result,
            Err(HttpError::InsecureEndpoint { url }) if url.starts_with("http://")
        ));
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config());

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("BigBuy API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = BigBuyConfig::builder()
            .app_key(AppKey::new("test-app-key").unwrap())
            .user_agent_prefix("MyShop/1.0")
            .build()
            .unwrap();

        let client = HttpClient::new(&config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyShop/1.0 | BigBuy API Library v"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&config());

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_debug_does_not_leak_app_key() {
        let client = HttpClient::new(&config());
        let debug_str = format!("{client:?}");
        assert!(!debug_str.contains("test-app-key"));
    }

    #[test]
    fn test_retry_budget_follows_config() {
        assert_eq!(HttpClient::new(&config()).rate_limit_retries, 0);

        let config = BigBuyConfig::builder()
            .app_key(AppKey::new("test-app-key").unwrap())
            .retry_on_rate_limit(true)
            .max_rate_limit_retries(3)
            .build()
            .unwrap();
        assert_eq!(HttpClient::new(&config).rate_limit_retries, 3);
    }
}
