//! Classification of BigBuy responses into success or an [`ApiError`].
//!
//! The upstream API is not consistent about how it reports failures. On
//! top of plain non-2xx responses it sends:
//!
//! - 200 responses whose JSON body is an error (`{"code": 409, "message":
//!   "Something went wrong ..."}`)
//! - 200 responses whose body embeds a second raw HTTP response, status
//!   line and headers included
//! - HTML error pages from its gateway or framework
//! - error messages that are themselves JSON documents
//!   (`{"info": ..., "data": ...}`)
//!
//! [`classify_response`] recognizes all of these by their literal
//! signatures and maps each failure to exactly one [`ApiError`] variant.
//! It is a pure function of the response: no state is kept between calls.

mod html;
mod validation;

pub use html::{extract_error_text, GATEWAY_TIMEOUT_HEADING};
pub use validation::{describe_fields, flat_children_errors, trim_empty_collections};

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::clients::api_error::{ApiError, ApiErrorKind, ErrorCode, ErrorContext, Warehouse};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::RATE_LIMIT_RESPONSE_TEXT;
use validation::value_to_text;

/// Upper bound on soft-error unwrapping for a single response.
const MAX_SOFT_ERROR_UNWRAPS: usize = 2;

/// Marker of an error body sent with a 200 status.
const SOFT_ERROR_MARKER: &str = "Something went wrong";

/// Marker of an order split across warehouses.
const WAREHOUSE_SPLIT_MARKER: &str = "different warehouses";

/// Top-level message of a validation failure.
const VALIDATION_FAILED: &str = "Validation Failed";

/// Prefix of a validation failure's rendered form errors.
const VALIDATION_ERROR_MARKER: &str = "ERROR:";

/// `info` text of a per-product error list.
const PRODUCTS_ERROR: &str = "Products error.";

/// Body fragments of transient upstream failures.
const TRANSIENT_SIGNATURES: [&str; 3] = [
    "Internal Server Error",
    "Bad Gateway",
    GATEWAY_TIMEOUT_HEADING,
];

static EMBEDDED_HTTP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^HTTP/1\.\d (\d{3})[^\r\n]*(?:\r?\n[^\r\n]+)*\r?\n\r?\n((?s:.*))$")
        .expect("valid embedded response regex")
});

/// Checks a response and turns any failure into an [`ApiError`].
///
/// Returns `Ok(())` only when the response is a genuine success.
///
/// # Errors
///
/// Returns the single [`ApiError`] variant matching the failure.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::clients::{classify_response, ApiError};
/// use bigbuy_api::HttpResponse;
///
/// let ok = HttpResponse::new(200, Default::default(), r#"{"id": 1}"#);
/// assert!(classify_response(&ok).is_ok());
///
/// let soft = HttpResponse::new(200, Default::default(), r#"{"code":409,"message":"Something went wrong 56783360"}"#);
/// assert!(matches!(classify_response(&soft), Err(ApiError::Response(_))));
/// ```
pub fn classify_response(response: &HttpResponse) -> Result<(), ApiError> {
    let mut current = Cow::Borrowed(response);

    for _ in 0..MAX_SOFT_ERROR_UNWRAPS {
        if !current.is_ok() {
            break;
        }
        let Some(corrected) = unwrap_soft_error(&current) else {
            break;
        };
        tracing::debug!(
            "Unwrapped soft error: status {} reported as {}",
            current.code,
            corrected.code
        );
        current = Cow::Owned(corrected);
    }

    if current.is_ok() {
        return Ok(());
    }

    Err(classify_failure(current.into_owned()))
}

/// Parses text as JSON, treating empty text and `null` as nothing.
///
/// # Example
///
/// ```rust
/// use bigbuy_api::clients::json_or_none;
///
/// assert!(json_or_none("").is_none());
/// assert!(json_or_none("null").is_none());
/// assert_eq!(json_or_none("[1]"), Some(serde_json::json!([1])));
/// ```
#[must_use]
pub fn json_or_none(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .ok()
        .filter(|value: &Value| !value.is_null())
}

/// Returns the corrected response if a 2xx response hides an error.
fn unwrap_soft_error(response: &HttpResponse) -> Option<HttpResponse> {
    if let Some(code) = json_object(&response.text).and_then(|body| soft_error_code(&body)) {
        return Some(response.with_status_and_text(code, response.text.clone()));
    }

    let captures = EMBEDDED_HTTP_RE.captures(&response.text)?;
    let code = captures.get(1)?.as_str().parse().ok()?;
    let body = captures.get(2).map_or("", |body| body.as_str());
    Some(response.with_status_and_text(code, body))
}

/// Matches `{"code": 4xx|5xx, "message": "Something went wrong ..."}`,
/// optionally with an `error_detail` field and nothing else.
fn soft_error_code(body: &Map<String, Value>) -> Option<u16> {
    let only_known_keys = body
        .keys()
        .all(|key| matches!(key.as_str(), "code" | "message" | "error_detail"));
    if !only_known_keys {
        return None;
    }

    let code = body.get("code")?.as_u64()?;
    let message = body.get("message")?.as_str()?;
    if !(400..600).contains(&code) || !message.contains(SOFT_ERROR_MARKER) {
        return None;
    }
    u16::try_from(code).ok()
}

/// Returns the body as a JSON object if it is one.
fn json_object(text: &str) -> Option<Map<String, Value>> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    match json_or_none(text)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn classify_failure(response: HttpResponse) -> ApiError {
    match json_object(&response.text) {
        Some(content) => classify_json(&content, response),
        None => classify_text(response),
    }
}

/// Classifies a failure whose body is not a JSON object.
fn classify_text(response: HttpResponse) -> ApiError {
    let text = response.text.as_str();

    if text == RATE_LIMIT_RESPONSE_TEXT {
        let context = ErrorContext::new(text, response.clone());
        return ApiError::from_kind(ApiErrorKind::RateLimit, context);
    }

    let message = if html::looks_like_html(text) {
        html::extract_error_text(text)
    } else if html::is_gateway_timeout(text) {
        html::strip_status_heading(text).trim().to_string()
    } else {
        text.to_string()
    };

    let kind = if html::is_gateway_timeout(text) {
        ApiErrorKind::Timeout
    } else if response.is_server_error()
        || TRANSIENT_SIGNATURES
            .iter()
            .any(|signature| text.contains(signature))
    {
        ApiErrorKind::Server
    } else {
        ApiErrorKind::Response
    };

    ApiError::from_kind(kind, ErrorContext::new(message, response))
}

/// Classifies a failure whose body is a JSON object.
fn classify_json(content: &Map<String, Value>, response: HttpResponse) -> ApiError {
    let sibling_code = content.get("code");
    let sibling_message = content.get("message");

    let (bb_code, message) = match content.get("errors").filter(|errors| !is_empty(errors)) {
        Some(Value::Object(errors)) if sibling_code.is_some() && sibling_message.is_some() => {
            let bb_code = sibling_code.and_then(ErrorCode::from_json);
            let top_message = sibling_message.map(value_to_text).unwrap_or_default();
            let error_fields =
                flat_children_errors(errors.get("children").unwrap_or(&Value::Null));

            if top_message == VALIDATION_FAILED || top_message.contains(VALIDATION_ERROR_MARKER) {
                let context = ErrorContext::new(top_message, response)
                    .with_code(bb_code)
                    .with_data(trim_empty_collections(&Value::Object(errors.clone())));
                return ApiError::Validation {
                    context: Box::new(context),
                    error_fields,
                };
            }

            let message = if error_fields.is_empty() {
                top_message
            } else {
                describe_fields(&error_fields)
            };
            (bb_code, message)
        }
        Some(Value::Array(errors)) => {
            let first = &errors[0];
            let bb_code = first.get("code").and_then(ErrorCode::from_json);
            let message = first
                .get("message")
                .map_or_else(|| value_to_text(first), value_to_text);
            (bb_code, message)
        }
        Some(errors) => (
            sibling_code.and_then(ErrorCode::from_json),
            value_to_text(errors),
        ),
        None => match (sibling_code, sibling_message) {
            (Some(code), Some(message)) => (ErrorCode::from_json(code), value_to_text(message)),
            _ => match content.get("error") {
                Some(Value::String(error)) => (None, error.clone()),
                _ => (None, Value::Object(content.clone()).to_string()),
            },
        },
    };

    if message.contains(WAREHOUSE_SPLIT_MARKER) {
        if let Some(raw) = content
            .get("error_detail")
            .and_then(|detail| detail.get("warehouses"))
            .and_then(Value::as_array)
        {
            let warehouses = raw.iter().filter_map(warehouse_from_json).collect();
            let context = ErrorContext::new(message, response)
                .with_code(bb_code)
                .with_data(Some(Value::Array(raw.clone())));
            return ApiError::WarehouseSplit {
                context: Box::new(context),
                warehouses,
            };
        }
    }

    // Application-level 5xx codes win over the transport status.
    if bb_code
        .as_ref()
        .and_then(ErrorCode::as_number)
        .is_some_and(|code| code / 100 == 5)
    {
        let context = ErrorContext::new(message, response).with_code(bb_code);
        return ApiError::from_kind(ApiErrorKind::Server, context);
    }

    let fallback = if response.is_server_error() {
        ApiErrorKind::Server
    } else {
        ApiErrorKind::Response
    };

    let (info, data, nested) = match nested_message(&message) {
        Some((info, data)) => (info, data, true),
        None => (message, None, false),
    };

    if nested {
        if let Some(kind) = bb_code
            .as_ref()
            .and_then(ErrorCode::as_text)
            .and_then(ApiErrorKind::from_bb_code)
        {
            let context = ErrorContext::new(info, response)
                .with_code(bb_code)
                .with_data(data);
            return ApiError::from_kind(kind, context);
        }
    }

    if !response.is_server_error() && info == PRODUCTS_ERROR {
        if let Some(records) = data.as_ref().and_then(product_records) {
            return products_error(&records, response, bb_code, data);
        }
    }

    let context = ErrorContext::new(info, response)
        .with_code(bb_code)
        .with_data(data);
    ApiError::from_kind(fallback, context)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Reads one `error_detail.warehouses` entry.
///
/// Ids may be numbers or numeric strings and references may be numbers.
/// Entries without a usable id are left out; the raw list stays in
/// `bb_data`.
fn warehouse_from_json(entry: &Value) -> Option<Warehouse> {
    let id = match entry.get("id")? {
        Value::Number(id) => id.as_u64()?,
        Value::String(id) => id.trim().parse().ok()?,
        _ => return None,
    };
    let references = entry
        .get("references")
        .and_then(Value::as_array)
        .map(|references| {
            references
                .iter()
                .filter(|reference| reference.is_string() || reference.is_number())
                .map(value_to_text)
                .collect()
        })
        .unwrap_or_default();
    Some(Warehouse { id, references })
}

/// Decodes a message of the form `{"info": ..., "data": ...}`.
fn nested_message(message: &str) -> Option<(String, Option<Value>)> {
    let mut payload = json_object(message)?;
    let info = value_to_text(payload.get("info")?);
    let data = payload.remove("data").filter(|data| !data.is_null());
    Some((info, data))
}

/// One entry of a "Products error." payload.
#[derive(Debug)]
struct ProductIssue {
    sku: Option<String>,
    message: Option<String>,
}

/// Reads a non-empty list of `{sku, message}` records.
///
/// Each field is optional per record; a numeric sku is kept as text.
fn product_records(data: &Value) -> Option<Vec<ProductIssue>> {
    let records = data.as_array().filter(|records| !records.is_empty())?;
    records
        .iter()
        .map(|record| {
            let record = record.as_object()?;
            let text = |key: &str| {
                record
                    .get(key)
                    .filter(|value| value.is_string() || value.is_number())
                    .map(value_to_text)
            };
            Some(ProductIssue {
                sku: text("sku"),
                message: text("message"),
            })
        })
        .collect::<Option<Vec<_>>>()
        .filter(|records| records.iter().any(|record| record.sku.is_some()))
}

fn products_error(
    records: &[ProductIssue],
    response: HttpResponse,
    bb_code: Option<ErrorCode>,
    data: Option<Value>,
) -> ApiError {
    let skus: Vec<String> = records
        .iter()
        .filter_map(|record| record.sku.clone())
        .collect();
    let detail = match records {
        [ProductIssue {
            message: Some(message),
            ..
        }] => message.clone(),
        _ => skus.join(", "),
    };
    let prefix = PRODUCTS_ERROR.trim_end_matches('.');

    let context = ErrorContext::new(format!("{prefix}: {detail}"), response)
        .with_code(bb_code)
        .with_data(data);
    ApiError::Product {
        context: Box::new(context),
        skus,
    }
}
