//! API environment selection.
//!
//! BigBuy exposes a sandbox and a production environment with identical
//! endpoints under different hosts.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Base URL of the sandbox environment.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.bigbuy.eu/rest";

/// Base URL of the production environment.
pub const PRODUCTION_BASE_URL: &str = "https://api.bigbuy.eu/rest";

/// The BigBuy environment requests are sent to.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::ApiMode;
///
/// let mode: ApiMode = "production".parse().unwrap();
/// assert_eq!(mode, ApiMode::Production);
/// assert_eq!(mode.base_url(), "https://api.bigbuy.eu/rest");
/// assert_eq!(ApiMode::default(), ApiMode::Sandbox);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApiMode {
    /// The sandbox environment. Orders placed here are never shipped.
    #[default]
    Sandbox,
    /// The live environment.
    Production,
}

impl ApiMode {
    /// Returns the REST base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for ApiMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ConfigError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}
