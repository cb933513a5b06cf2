//! Error types for the BigBuy API client.
//!
//! This module contains the error type used for configuration and
//! validation errors. Errors produced while talking to the API live in
//! [`crate::clients`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use bigbuy_api::{AppKey, ConfigError};
//!
//! let result = AppKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAppKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// App key cannot be empty.
    #[error("App key cannot be empty. Please provide a valid BigBuy API key.")]
    EmptyAppKey,

    /// API mode is not one of the known modes.
    #[error("Invalid API mode '{mode}'. Expected 'sandbox' or 'production'.")]
    InvalidMode {
        /// The invalid mode string that was provided.
        mode: String,
    },

    /// Rate-limit retries were enabled with an empty retry budget.
    #[error("Rate-limit retries are enabled but max_rate_limit_retries is 0. Use at least 1 or disable retries.")]
    ZeroRetryBudget,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
