use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why an endpoint URL was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// Not a URL at all
    ParseError,
    /// No host
    MissingAuthority,
    /// No `http`/`https` scheme
    MissingScheme,
}

/// Failure to obtain a response from the service.
///
/// Every HTTP status, including 4xx and 5xx, is a response and therefore
/// not an `HttpError`; the client crate turns those into service faults.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("could not assemble request")]
    RequestBuild(#[from] http::Error),

    #[error("bad header name")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("bad header value")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// One attempt ran past the per-request timeout.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The call, retries included, ran past the total timeout.
    #[error("call deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// Connection refused, reset, DNS and similar socket failures.
    #[error("connection failure: {0}")]
    Transport(#[source] BoxError),

    #[error("tls setup failed: {0}")]
    Tls(#[source] BoxError),

    /// Raised by the auth layer before the request left the process.
    #[error("signing failed: {0}")]
    Signing(#[source] BoxError),

    #[error("response body of {actual} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { limit: usize, actual: usize },

    /// The concurrency limit is saturated.
    #[error("too many requests in flight")]
    Overloaded,

    /// The buffer worker is gone.
    #[error("transport worker stopped")]
    ServiceClosed,

    /// `reason` is log text only; match on `kind`.
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    #[error("scheme '{scheme}' rejected: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// Whether sending the same request again may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_) | Self::Overloaded)
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
