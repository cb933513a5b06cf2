//! Validated newtype wrappers for configuration values.

use crate::error::ConfigError;
use std::fmt;

/// Number of leading characters of an [`AppKey`] shown in debug output.
const VISIBLE_KEY_CHARS: usize = 10;

/// A validated BigBuy application key.
///
/// The key is sent as a bearer token on every request. Its `Debug` output
/// only reveals the first few characters, which is enough to tell keys
/// apart in logs without leaking them.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::AppKey;
///
/// let key = AppKey::new("top_secret_app_key").unwrap();
/// assert_eq!(key.as_ref(), "top_secret_app_key");
/// assert_eq!(format!("{:?}", key), "AppKey(top_secret…)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AppKey(String);

impl AppKey {
    /// Creates a new validated app key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAppKey`] if the key is empty or blank.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyAppKey);
        }
        Ok(Self(key))
    }

    /// Returns the masked form of the key used in debug output.
    #[must_use]
    pub fn masked(&self) -> String {
        let visible: String = self.0.chars().take(VISIBLE_KEY_CHARS).collect();
        format!("{visible}…")
    }
}

impl AsRef<str> for AppKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppKey({})", self.masked())
    }
}
