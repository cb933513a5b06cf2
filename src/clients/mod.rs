//! HTTP client types for BigBuy API communication.
//!
//! This module provides the transport layer for the BigBuy API: sending
//! authenticated requests, classifying responses into success or a typed
//! error, and waiting out rate limits.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A raw response (status, headers, text)
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`ApiError`]: The closed taxonomy of errors reported by the API
//! - [`RateLimit`]: Reset information of an exceeded rate limit
//! - [`classify_response`]: Maps a response to success or an [`ApiError`]
//! - [`rest::RestClient`]: Higher-level client returning decoded JSON
//! - [`rest::RestError`]: REST-specific error types
//!
//! # Example
//!
//! ```rust,ignore
//! use bigbuy_api::{AppKey, BigBuyConfig, HttpClient, HttpMethod, HttpRequest};
//!
//! let config = BigBuyConfig::builder()
//!     .app_key(AppKey::new("my-app-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = HttpClient::new(&config);
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "catalog/languages")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! Only rate limits are retried, and only when `retry_on_rate_limit` is
//! enabled:
//!
//! - **Rate limit with `X-Ratelimit-Reset`**: waits until the reset time
//!   (plus 10ms) and resends, up to `max_rate_limit_retries` times
//! - **Rate limit without a usable reset header**: returned immediately
//! - **Any other error**: returned immediately

mod api_error;
mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod rate_limit;
pub mod rest;

pub use api_error::{ApiError, ApiErrorKind, ErrorCode, ErrorContext, Warehouse, ERROR_CODES};
pub use classify::{
    classify_response, describe_fields, extract_error_text, flat_children_errors, json_or_none,
    trim_empty_collections, GATEWAY_TIMEOUT_HEADING,
};
pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, RATE_LIMIT_RESET_HEADER};
pub use rate_limit::{RateLimit, DEFAULT_ADDITIONAL_DELAY, RATE_LIMIT_RESPONSE_TEXT};

// Re-export REST client types at the clients module level
pub use rest::{RestClient, RestError};
