//! REST client implementation for the BigBuy API.
//!
//! This module provides the [`RestClient`] type, which sends requests through
//! an [`HttpClient`] and decodes successful responses as JSON.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::rest::RestError;
use crate::config::{AppKey, BigBuyConfig};

/// REST API client for the BigBuy API.
///
/// Provides `get_json`, `post_json`, `put_json` and `delete_json`, which
/// return the decoded JSON body of a successful response.
///
/// A result of `Ok(None)` means the response carried no data: either the
/// body was empty (with `none_on_empty`) or the resource was not found
/// (with `none_on_404`).
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use bigbuy_api::{AppKey, BigBuyConfig, RestClient};
/// use serde_json::json;
///
/// let config = BigBuyConfig::builder()
///     .app_key(AppKey::new("my-app-key").unwrap())
///     .retry_on_rate_limit(true)
///     .build()
///     .unwrap();
///
/// let client = RestClient::new(&config);
///
/// let languages = client.get_json("catalog/languages", None).await?;
///
/// let order = json!({"order": {"internalReference": "123456"}});
/// let check = client.post_json("order/check", order).await?;
/// ```
pub struct RestClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
    app_key: AppKey,
    none_on_404: bool,
    none_on_empty: bool,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created (see
    /// [`HttpClient::new`]).
    #[must_use]
    pub fn new(config: &BigBuyConfig) -> Self {
        Self {
            http_client: HttpClient::new(config),
            app_key: config.app_key().clone(),
            none_on_404: config.none_on_404(),
            none_on_empty: config.none_on_empty(),
        }
    }

    /// Returns the REST base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http_client.base_url()
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the endpoint is empty,
    /// [`RestError::InvalidJson`] if a successful body is not JSON, and
    /// [`RestError::Http`] for HTTP-level errors.
    pub async fn get_json(
        &self,
        endpoint: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<Option<Value>, RestError> {
        self.request_json(HttpMethod::Get, endpoint, None, query)
            .await
    }

    /// Sends a POST request with a JSON body and decodes the response body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::get_json`].
    pub async fn post_json(&self, endpoint: &str, body: Value) -> Result<Option<Value>, RestError> {
        self.request_json(HttpMethod::Post, endpoint, Some(body), None)
            .await
    }

    /// Sends a PUT request with a JSON body and decodes the response body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::get_json`].
    pub async fn put_json(&self, endpoint: &str, body: Value) -> Result<Option<Value>, RestError> {
        self.request_json(HttpMethod::Put, endpoint, Some(body), None)
            .await
    }

    /// Sends a DELETE request and decodes the response body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::get_json`].
    pub async fn delete_json(
        &self,
        endpoint: &str,
        query: Option<HashMap<String, String>>,
    ) -> Result<Option<Value>, RestError> {
        self.request_json(HttpMethod::Delete, endpoint, None, query)
            .await
    }

    async fn request_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
        query: Option<HashMap<String, String>>,
    ) -> Result<Option<Value>, RestError> {
        let endpoint = normalize_endpoint(endpoint)?;

        let mut builder = HttpRequest::builder(method, endpoint);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let request = builder.build().map_err(|e| RestError::Http(e.into()))?;

        let response = match self.http_client.request(request).await {
            Ok(response) => response,
            Err(HttpError::Api(error)) if self.none_on_404 && error.status() == 404 => {
                tracing::debug!("Treating 404 as no data: {}", error);
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        if response.text.trim().is_empty() {
            return Ok(self.empty_body());
        }

        let value: Value =
            serde_json::from_str(&response.text).map_err(|e| RestError::InvalidJson {
                message: e.to_string(),
            })?;

        if value.is_null() {
            return Ok(self.empty_body());
        }
        Ok(Some(value))
    }

    fn empty_body(&self) -> Option<Value> {
        (!self.none_on_empty).then_some(Value::Null)
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigBuy")
            .field("key", &self.app_key.masked())
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

/// Normalizes a relative endpoint.
///
/// Strips leading `/` characters and a trailing `.json` suffix; the HTTP
/// client appends the suffix again. Absolute URLs are left untouched.
fn normalize_endpoint(endpoint: &str) -> Result<String, RestError> {
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        return Ok(endpoint.to_string());
    }

    let path = endpoint.trim_start_matches('/');
    let path = path.strip_suffix(".json").unwrap_or(path);

    if path.is_empty() {
        return Err(RestError::InvalidPath {
            path: endpoint.to_string(),
        });
    }

    Ok(path.to_string())
}
