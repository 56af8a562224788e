#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Typed async client for the Amazon Connect contact-center API.
//!
//! Every operation is one row of a declarative service model. A row names
//! the HTTP binding of the operation's input and its output type; one
//! generic engine does the rest:
//!
//! - the marshaller turns the input into path labels, query string, headers
//!   and a JSON body
//! - the dispatcher resolves credentials, sends the request through the
//!   signing `connect-http` stack and records per-call metrics
//! - a 2xx body is decoded into the output type; anything else goes through
//!   the error chain into a [`ServiceError`] tagged with a [`FaultKind`]
//!
//! List operations also stream their pages through
//! [`ConnectClient::pages`] and [`ConnectClient::items`].

mod client;
pub mod config;
mod dispatcher;
mod error;
pub mod humantime_serde;
pub mod metrics;
pub mod model;
mod operation;
mod paginator;
mod protocol;
mod service;
pub mod timestamp;

pub use client::{ConnectClient, ConnectClientBuilder, SERVICE_NAME};
pub use config::{ConfigError, ConnectConfig, StaticCredentialsConfig};
pub use dispatcher::{CallOptions, INVOCATION_ID_HEADER, ResponseMetadata};
pub use error::{ConnectError, ErrorOrigin, FAULT_REGISTRY, FaultKind, ServiceError};
pub use metrics::{CallMetricLabels, CallOutcome, CallPhase, ClientMetrics, LoggingMetrics, NoOpMetrics};
pub use operation::{Operation, OperationDescriptor};
pub use paginator::{ItemsPager, Page, PagerError, PagesPager, Paginated};
pub use protocol::{
    CONTENT_TYPE, ERROR_MESSAGE_HEADER, ERROR_TYPE_HEADER, REQUEST_ID_HEADER, WireRequest, marshal,
    parse_service_error, unmarshal,
};
pub use service::*;

pub use connect_auth::{
    CachingProvider, ChainProvider, Credentials, CredentialsError, EnvironmentProvider, FnProvider,
    ProvideCredentials, SecretString, SharedCredentialsProvider, StaticProvider,
};
pub use connect_http::HttpError;
