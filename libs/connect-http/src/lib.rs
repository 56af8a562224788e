#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the contact-center service client.
//!
//! A hyper-based client wrapped in a tower middleware stack:
//! - TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - Per-attempt and total timeouts
//! - Retries with exponential backoff and `Retry-After` support
//! - Concurrency limiting with fail-fast load shedding
//! - User-Agent injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - An auth-layer hook, used for request signing, that runs once per attempt
//!
//! `send()` returns `Ok` for every HTTP status. Only transport, TLS and
//! timeout failures are errors; routing on status is left to the caller.
//!
//! # Example
//!
//! ```ignore
//! use connect_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("my-app/1.0")
//!     .build()?;
//!
//! let resp = client
//!     .request(http::Method::GET, "https://connect.us-east-1.amazonaws.com/users-summary/abc")
//!     .send()
//!     .await?;
//! let body = resp.bytes().await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::{HttpClientBuilder, InnerService};
pub use client::HttpClient;
pub use config::{
    DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT, DEFAULT_USER_AGENT, ExponentialBackoff, HttpClientConfig,
    NonIdempotent, RetryConfig, RetryTrigger, TlsRootConfig, TransportSecurity,
    is_idempotent_method,
};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{
    RETRY_ATTEMPT_HEADER, RetryLayer, RetryService, TraceLayer, TraceService, UserAgentLayer,
    UserAgentService,
};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody, parse_retry_after};
