//! # BigBuy API Rust Client
//!
//! An async client for the BigBuy dropshipping REST API, with typed errors
//! for every failure the API reports and built-in handling of its rate
//! limit.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`BigBuyConfig`] and [`BigBuyConfigBuilder`]
//! - A validated [`AppKey`] newtype that never prints the full key
//! - Sandbox and production environments via [`ApiMode`]
//! - An async HTTP client that classifies every response into success or
//!   one [`ApiError`] variant, including the errors BigBuy sends with a
//!   200 status
//! - Rate-limit tracking via [`RateLimit`], with optional wait-and-retry
//! - A REST client returning decoded JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use bigbuy_api::{ApiMode, AppKey, BigBuyConfig};
//!
//! let config = BigBuyConfig::builder()
//!     .app_key(AppKey::new("your-app-key").unwrap())
//!     .mode(ApiMode::Sandbox)
//!     .retry_on_rate_limit(true)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use bigbuy_api::{ApiError, RestClient, RestError};
//!
//! let client = RestClient::new(&config);
//!
//! match client.post_json("order/check", order).await {
//!     Ok(check) => println!("{check:?}"),
//!     Err(e) => match e.api_error() {
//!         Some(ApiError::Stock { skus, .. }) => println!("out of stock: {skus:?}"),
//!         Some(ApiError::WarehouseSplit { warehouses, .. }) => {
//!             // send one request per warehouse
//!         }
//!         Some(error) if error.is_server_error() => println!("try again later"),
//!         _ => return Err(e.into()),
//!     },
//! }
//! ```
//!
//! ## Classifying Responses
//!
//! [`classify_response`] is a pure function and can be used on its own:
//!
//! ```rust
//! use bigbuy_api::{classify_response, ApiError, HttpResponse};
//!
//! let response = HttpResponse::new(
//!     504,
//!     Default::default(),
//!     "<html><body><h1>504 Gateway Time-out</h1>\nThe server didn't respond in time.\n</body></html>",
//! );
//!
//! let error = classify_response(&response).unwrap_err();
//! assert!(matches!(error, ApiError::Timeout(_)));
//! assert_eq!(error.message(), "The server didn't respond in time.");
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{ApiMode, AppKey, BigBuyConfig, BigBuyConfigBuilder, Waiter};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    classify_response, ApiError, ApiErrorKind, ErrorCode, ErrorContext, HttpClient, HttpError,
    HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse, InvalidHttpRequestError, RateLimit,
    RestClient, RestError, Warehouse,
};
