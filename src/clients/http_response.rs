//! HTTP response type for the BigBuy API client.
//!
//! [`HttpResponse`] is a plain snapshot of a completed response: status
//! code, headers and raw body text. It is what the response classifier
//! inspects and what every [`ApiError`](crate::clients::ApiError) carries
//! back to the caller, so it can be built from test fixtures without any
//! network layer.

use std::collections::HashMap;

/// Header carrying the Unix timestamp at which a rate limit resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "X-Ratelimit-Reset";

/// A completed HTTP response from the BigBuy API.
///
/// Header names are stored lowercased; [`HttpResponse::header`] lookups are
/// case-insensitive.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::HttpResponse;
///
/// let response = HttpResponse::new(429, Default::default(), "You exceeded the rate limit")
///     .with_header("X-Ratelimit-Reset", "1700000000");
///
/// assert!(!response.is_ok());
/// assert_eq!(response.header("x-ratelimit-reset"), Some("1700000000"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub text: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, normalizing header names to lowercase.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        text: impl Into<String>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            text: text.into(),
        }
    }

    /// Returns a copy of this response with an extra header value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.to_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Returns a copy of this response with a different status and body.
    ///
    /// Used when a soft error hidden in a 2xx body is unwrapped.
    #[must_use]
    pub fn with_status_and_text(&self, code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            headers: self.headers.clone(),
            text: text.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the response status code is in the 5xx range.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500 && self.code <= 599
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the raw `X-Ratelimit-Reset` header value, if present.
    #[must_use]
    pub fn rate_limit_reset(&self) -> Option<&str> {
        self.header(RATE_LIMIT_RESET_HEADER)
    }
}
