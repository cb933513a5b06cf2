//! Transport-level error types.
//!
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: everything that can go wrong while sending a request,
//!   including the classified [`ApiError`] of a failed response
//!
//! # Example
//!
//! ```rust,ignore
//! use bigbuy_api::clients::{ApiError, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("{}", response.text),
//!     Err(HttpError::Api(ApiError::RateLimit { rate_limit, .. })) => {
//!         println!("throttled until {:?}", rate_limit.map(|r| r.reset_time()));
//!     }
//!     Err(HttpError::Api(e)) => println!("API error {}: {}", e.status(), e),
//!     Err(e) => println!("{e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::api_error::ApiError;

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET or DELETE request was given a body.
    #[error("Cannot send a body with {method}; use query parameters instead.")]
    UnexpectedBody {
        /// The HTTP method that does not take a body.
        method: String,
    },

    /// The endpoint is empty.
    #[error("Cannot send a request without an endpoint.")]
    EmptyEndpoint,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API answered with an error, classified into the upstream taxonomy.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The endpoint uses plain HTTP.
    #[error("Refusing to send a request over plain HTTP: {url}")]
    InsecureEndpoint {
        /// The rejected URL.
        url: String,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the classified API error, if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}
