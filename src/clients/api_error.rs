//! Errors reported by the BigBuy API.
//!
//! Every failed response is turned into exactly one [`ApiError`] variant.
//! All variants share an [`ErrorContext`] (message, response snapshot,
//! upstream error code and data payload); some carry extra structured
//! fields so callers can branch without parsing message text.
//!
//! # Example
//!
//! ```rust,ignore
//! use bigbuy_api::clients::ApiError;
//!
//! match client.post_json("order/create", order).await {
//!     Err(RestError::Http(HttpError::Api(ApiError::Stock { skus, .. }))) => {
//!         println!("out of stock: {skus:?}");
//!     }
//!     Err(RestError::Http(HttpError::Api(ApiError::WarehouseSplit { warehouses, .. }))) => {
//!         // send one request per warehouse
//!     }
//!     other => { /* ... */ }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::RateLimit;

/// Upstream error codes and the variant each one maps to.
pub const ERROR_CODES: [(&str, ApiErrorKind); 13] = [
    ("ER001", ApiErrorKind::ProductNotFound),
    ("ER002", ApiErrorKind::IncorrectRef),
    ("ER003", ApiErrorKind::Stock),
    ("ER004", ApiErrorKind::ZipcodeFormat),
    ("ER005", ApiErrorKind::MoneyBoxTooLow),
    ("ER007", ApiErrorKind::OrderTooLow),
    ("ER008", ApiErrorKind::OrderAlreadyExists),
    ("ER009", ApiErrorKind::TemporaryOrder),
    ("ER010", ApiErrorKind::NoCarrier),
    ("ER011", ApiErrorKind::InvalidPayment),
    ("ER012", ApiErrorKind::BankWireTooLow),
    ("ER013", ApiErrorKind::Export),
    ("ER014", ApiErrorKind::Pack),
];

/// The upstream error code of a response, distinct from the HTTP status.
///
/// BigBuy uses both `"ERxxx"` strings and HTTP-like integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// A textual code such as `"ER003"`.
    Text(String),
    /// A numeric code such as `409`.
    Number(i64),
}

impl ErrorCode {
    /// Reads an error code from a JSON string or integer.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Number(number) => number.as_i64().map(Self::Number),
            _ => None,
        }
    }

    /// Returns the numeric value of the code, parsing digit-only text codes.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.parse().ok(),
        }
    }

    /// Returns the code as text if it is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Data shared by every [`ApiError`] variant.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorContext {
    /// Human-readable error text.
    pub message: String,
    /// The response the error was derived from.
    pub response: HttpResponse,
    /// The upstream error code, if the body carried one.
    pub bb_code: Option<ErrorCode>,
    /// Structured data attached to the error by the upstream API.
    pub bb_data: Option<Value>,
}

impl ErrorContext {
    /// Creates a context with only a message and a response.
    #[must_use]
    pub fn new(message: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            message: message.into(),
            response,
            bb_code: None,
            bb_data: None,
        }
    }

    /// Attaches an upstream error code.
    #[must_use]
    pub fn with_code(mut self, bb_code: Option<ErrorCode>) -> Self {
        self.bb_code = bb_code;
        self
    }

    /// Attaches an upstream data payload.
    #[must_use]
    pub fn with_data(mut self, bb_data: Option<Value>) -> Self {
        self.bb_data = bb_data;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A warehouse and the product references it ships, as reported when an
/// order must be split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// The warehouse id.
    pub id: u64,
    /// Product references stocked in this warehouse.
    pub references: Vec<String>,
}

/// Tag of an [`ApiError`] variant, without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Any failure not otherwise classified.
    Response,
    /// The rate limit was exceeded.
    RateLimit,
    /// A 5xx or transient upstream failure.
    Server,
    /// The upstream gateway timed out.
    Timeout,
    /// The request failed form validation.
    Validation,
    /// Generic product error.
    Product,
    /// `ER001`: product not found.
    ProductNotFound,
    /// `ER002`: incorrect product reference.
    IncorrectRef,
    /// `ER003`: not enough stock.
    Stock,
    /// `ER004`: zipcode has the wrong format.
    ZipcodeFormat,
    /// `ER005`: money box balance too low.
    MoneyBoxTooLow,
    /// `ER007`: order amount too low.
    OrderTooLow,
    /// `ER008`: order already exists.
    OrderAlreadyExists,
    /// `ER009`: temporary order error.
    TemporaryOrder,
    /// `ER010`: no carrier available.
    NoCarrier,
    /// `ER011`: invalid payment method.
    InvalidPayment,
    /// `ER012`: amount too low for a bank wire.
    BankWireTooLow,
    /// `ER013`: export error.
    Export,
    /// `ER014`: pack error.
    Pack,
    /// Products ship from several warehouses.
    WarehouseSplit,
}

impl ApiErrorKind {
    /// Looks up an upstream `ERxxx` code in [`ERROR_CODES`].
    #[must_use]
    pub fn from_bb_code(code: &str) -> Option<Self> {
        ERROR_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, kind)| *kind)
    }
}

/// An error reported by the BigBuy API.
///
/// Each variant carries the shared [`ErrorContext`]; the message of the
/// context is the `Display` output.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Fallback for any failure not otherwise classified.
    #[error("{0}")]
    Response(Box<ErrorContext>),

    /// The rate limit was exceeded.
    #[error("{context}")]
    RateLimit {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// Reset information, when the response carried a usable header.
        rate_limit: Option<RateLimit>,
    },

    /// A 5xx response or a known transient failure signature.
    #[error("{0}")]
    Server(Box<ErrorContext>),

    /// The upstream gateway timed out.
    #[error("{0}")]
    Timeout(Box<ErrorContext>),

    /// The request failed form validation.
    #[error("{context}")]
    Validation {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// Field path (e.g. `shippingAddress.lastName`) to messages.
        error_fields: BTreeMap<String, Vec<String>>,
    },

    /// Generic product error.
    #[error("{context}")]
    Product {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// SKUs the error applies to.
        skus: Vec<String>,
    },

    /// `ER001`: product not found.
    #[error("{context}")]
    ProductNotFound {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// SKUs the error applies to.
        skus: Vec<String>,
    },

    /// `ER002`: incorrect product reference.
    #[error("{context}")]
    IncorrectRef {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// SKUs the error applies to.
        skus: Vec<String>,
    },

    /// `ER003`: not enough stock.
    #[error("{context}")]
    Stock {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// SKUs the error applies to.
        skus: Vec<String>,
    },

    /// `ER004`: zipcode has the wrong format.
    #[error("{0}")]
    ZipcodeFormat(Box<ErrorContext>),

    /// `ER005`: money box balance too low.
    #[error("{0}")]
    MoneyBoxTooLow(Box<ErrorContext>),

    /// `ER007`: order amount too low.
    #[error("{0}")]
    OrderTooLow(Box<ErrorContext>),

    /// `ER008`: order already exists.
    #[error("{0}")]
    OrderAlreadyExists(Box<ErrorContext>),

    /// `ER009`: temporary order error.
    #[error("{0}")]
    TemporaryOrder(Box<ErrorContext>),

    /// `ER010`: no carrier available.
    #[error("{0}")]
    NoCarrier(Box<ErrorContext>),

    /// `ER011`: invalid payment method.
    #[error("{0}")]
    InvalidPayment(Box<ErrorContext>),

    /// `ER012`: amount too low for a bank wire.
    #[error("{0}")]
    BankWireTooLow(Box<ErrorContext>),

    /// `ER013`: export error.
    #[error("{0}")]
    Export(Box<ErrorContext>),

    /// `ER014`: pack error.
    #[error("{0}")]
    Pack(Box<ErrorContext>),

    /// Products ship from several warehouses and must be requested separately.
    #[error("{context}")]
    WarehouseSplit {
        /// Shared error data.
        context: Box<ErrorContext>,
        /// The warehouses and the references each one ships.
        warehouses: Vec<Warehouse>,
    },
}

impl ApiError {
    /// Builds the variant for `kind` from a context.
    ///
    /// Product-family variants take their SKUs from `bb_data` when it is a
    /// list of `{"sku": ...}` records. Rate-limit errors derive their reset
    /// information from the response.
    #[must_use]
    pub fn from_kind(kind: ApiErrorKind, context: ErrorContext) -> Self {
        let context = Box::new(context);
        match kind {
            ApiErrorKind::Response => Self::Response(context),
            ApiErrorKind::RateLimit => {
                let rate_limit = RateLimit::from_response(&context.response);
                Self::RateLimit {
                    context,
                    rate_limit,
                }
            }
            ApiErrorKind::Server => Self::Server(context),
            ApiErrorKind::Timeout => Self::Timeout(context),
            ApiErrorKind::Validation => Self::Validation {
                context,
                error_fields: BTreeMap::new(),
            },
            ApiErrorKind::Product => {
                let skus = skus_from_data(context.bb_data.as_ref());
                Self::Product { context, skus }
            }
            ApiErrorKind::ProductNotFound => {
                let skus = skus_from_data(context.bb_data.as_ref());
                Self::ProductNotFound { context, skus }
            }
            ApiErrorKind::IncorrectRef => {
                let skus = skus_from_data(context.bb_data.as_ref());
                Self::IncorrectRef { context, skus }
            }
            ApiErrorKind::Stock => {
                let skus = skus_from_data(context.bb_data.as_ref());
                Self::Stock { context, skus }
            }
            ApiErrorKind::ZipcodeFormat => Self::ZipcodeFormat(context),
            ApiErrorKind::MoneyBoxTooLow => Self::MoneyBoxTooLow(context),
            ApiErrorKind::OrderTooLow => Self::OrderTooLow(context),
            ApiErrorKind::OrderAlreadyExists => Self::OrderAlreadyExists(context),
            ApiErrorKind::TemporaryOrder => Self::TemporaryOrder(context),
            ApiErrorKind::NoCarrier => Self::NoCarrier(context),
            ApiErrorKind::InvalidPayment => Self::InvalidPayment(context),
            ApiErrorKind::BankWireTooLow => Self::BankWireTooLow(context),
            ApiErrorKind::Export => Self::Export(context),
            ApiErrorKind::Pack => Self::Pack(context),
            ApiErrorKind::WarehouseSplit => Self::WarehouseSplit {
                context,
                warehouses: Vec::new(),
            },
        }
    }

    /// Returns the tag of this variant.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Response(_) => ApiErrorKind::Response,
            Self::RateLimit { .. } => ApiErrorKind::RateLimit,
            Self::Server(_) => ApiErrorKind::Server,
            Self::Timeout(_) => ApiErrorKind::Timeout,
            Self::Validation { .. } => ApiErrorKind::Validation,
            Self::Product { .. } => ApiErrorKind::Product,
            Self::ProductNotFound { .. } => ApiErrorKind::ProductNotFound,
            Self::IncorrectRef { .. } => ApiErrorKind::IncorrectRef,
            Self::Stock { .. } => ApiErrorKind::Stock,
            Self::ZipcodeFormat(_) => ApiErrorKind::ZipcodeFormat,
            Self::MoneyBoxTooLow(_) => ApiErrorKind::MoneyBoxTooLow,
            Self::OrderTooLow(_) => ApiErrorKind::OrderTooLow,
            Self::OrderAlreadyExists(_) => ApiErrorKind::OrderAlreadyExists,
            Self::TemporaryOrder(_) => ApiErrorKind::TemporaryOrder,
            Self::NoCarrier(_) => ApiErrorKind::NoCarrier,
            Self::InvalidPayment(_) => ApiErrorKind::InvalidPayment,
            Self::BankWireTooLow(_) => ApiErrorKind::BankWireTooLow,
            Self::Export(_) => ApiErrorKind::Export,
            Self::Pack(_) => ApiErrorKind::Pack,
            Self::WarehouseSplit { .. } => ApiErrorKind::WarehouseSplit,
        }
    }

    /// Returns the data shared by all variants.
    #[must_use]
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Response(context)
            | Self::Server(context)
            | Self::Timeout(context)
            | Self::ZipcodeFormat(context)
            | Self::MoneyBoxTooLow(context)
            | Self::OrderTooLow(context)
            | Self::OrderAlreadyExists(context)
            | Self::TemporaryOrder(context)
            | Self::NoCarrier(context)
            | Self::InvalidPayment(context)
            | Self::BankWireTooLow(context)
            | Self::Export(context)
            | Self::Pack(context)
            | Self::RateLimit { context, .. }
            | Self::Validation { context, .. }
            | Self::Product { context, .. }
            | Self::ProductNotFound { context, .. }
            | Self::IncorrectRef { context, .. }
            | Self::Stock { context, .. }
            | Self::WarehouseSplit { context, .. } => context,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.context().message
    }

    /// Returns the response the error was derived from.
    #[must_use]
    pub fn response(&self) -> &HttpResponse {
        &self.context().response
    }

    /// Returns the HTTP status the error was classified under.
    ///
    /// For soft errors this is the corrected status, not the transport one.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.context().response.code
    }

    /// Returns the upstream error code, if any.
    #[must_use]
    pub fn bb_code(&self) -> Option<&ErrorCode> {
        self.context().bb_code.as_ref()
    }

    /// Returns the upstream data payload, if any.
    #[must_use]
    pub fn bb_data(&self) -> Option<&Value> {
        self.context().bb_data.as_ref()
    }

    /// Returns the SKUs of a product-family error, or an empty slice.
    #[must_use]
    pub fn skus(&self) -> &[String] {
        match self {
            Self::Product { skus, .. }
            | Self::ProductNotFound { skus, .. }
            | Self::IncorrectRef { skus, .. }
            | Self::Stock { skus, .. } => skus.as_slice(),
            _ => &[],
        }
    }

    /// Returns `true` for the product family (generic, not found,
    /// incorrect reference, stock).
    #[must_use]
    pub const fn is_product_error(&self) -> bool {
        matches!(
            self,
            Self::Product { .. }
                | Self::ProductNotFound { .. }
                | Self::IncorrectRef { .. }
                | Self::Stock { .. }
        )
    }

    /// Returns `true` for shipping errors (warehouse split, no carrier).
    #[must_use]
    pub const fn is_shipping_error(&self) -> bool {
        matches!(self, Self::WarehouseSplit { .. } | Self::NoCarrier(_))
    }

    /// Returns `true` for server-side failures (5xx, gateway timeout).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Timeout(_))
    }

    /// Returns `true` if this is a rate-limit error.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }
}

/// Collects the `sku` fields of a list of records.
fn skus_from_data(data: Option<&Value>) -> Vec<String> {
    data.and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|record| record.get("sku").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
