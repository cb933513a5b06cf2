//! REST-specific error types.
//!
//! - [`RestError::InvalidPath`]: the endpoint is empty after normalization
//! - [`RestError::InvalidJson`]: a success body is not valid JSON
//! - [`RestError::Http`]: wraps underlying HTTP errors, including the
//!   classified [`ApiError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use bigbuy_api::clients::rest::RestError;
//!
//! match client.get_json("catalog/languages", None).await {
//!     Ok(Some(languages)) => println!("{languages}"),
//!     Ok(None) => println!("nothing"),
//!     Err(e) if e.api_error().is_some_and(ApiError::is_server_error) => {
//!         println!("BigBuy is down, try again later");
//!     }
//!     Err(e) => println!("{e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::api_error::ApiError;
use crate::clients::errors::HttpError;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "/".to_string() };
/// assert_eq!(error.to_string(), "Invalid REST API path: /");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The endpoint is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// A successful response carried a body that is not valid JSON.
    #[error("Invalid JSON in response body: {message}")]
    InvalidJson {
        /// The decoder's error message.
        message: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl RestError {
    /// Returns the classified API error, if this is one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Http(error) => error.as_api_error(),
            _ => None,
        }
    }
}
