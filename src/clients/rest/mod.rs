//! REST client for the BigBuy API.
//!
//! This module provides a higher-level client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) that returns decoded JSON.
//!
//! # Overview
//!
//! - [`RestClient`]: `get_json()`, `post_json()`, `put_json()`, `delete_json()`
//! - [`RestError`]: Error type for REST API operations
//!
//! # Endpoint Normalization
//!
//! - Leading slashes are stripped: `/catalog/languages` -> `catalog/languages`
//! - A trailing `.json` is stripped; the HTTP client adds it back when
//!   building the URL
//! - Absolute `https://` URLs are sent as-is
//!
//! # Empty and Missing Data
//!
//! With `none_on_empty` (the default), an empty or `null` body yields
//! `Ok(None)`; otherwise it yields `Ok(Some(Value::Null))`. With
//! `none_on_404`, a 404 yields `Ok(None)` instead of an error.

mod client;
mod errors;

pub use client::RestClient;
pub use errors::RestError;
