use std::collections::HashSet;
use std::time::Duration;

use http::{Extensions, Method};

pub const DEFAULT_USER_AGENT: &str = concat!("connect-http/", env!("CARGO_PKG_VERSION"));

/// Capacity of the request queue in front of the stack.
const BUFFER_CAPACITY: usize = 1024;

/// What went wrong with an attempt, as seen by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RetryTrigger {
    /// Socket-level failure before a response arrived.
    TransportError,
    /// The per-attempt timeout fired.
    Timeout,
    /// The service answered with this status.
    Status(u16),
    /// Deadline, signing and worker failures. Never retried.
    NonRetryable,
}

impl RetryTrigger {
    pub const THROTTLED: Self = Self::Status(429);
    pub const REQUEST_TIMEOUT: Self = Self::Status(408);
    pub const INTERNAL_ERROR: Self = Self::Status(500);
    pub const BAD_GATEWAY: Self = Self::Status(502);
    pub const UNAVAILABLE: Self = Self::Status(503);
    pub const GATEWAY_TIMEOUT: Self = Self::Status(504);
}

/// Methods that may be replayed without changing the outcome (RFC 9110 9.2.2).
#[must_use]
pub fn is_idempotent_method(method: &Method) -> bool {
    [
        Method::GET,
        Method::HEAD,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
        Method::TRACE,
    ]
    .contains(method)
}

/// Request extension for a call that must not be replayed after a server or
/// connection failure, whatever its method.
///
/// Only the triggers in [`RetryConfig::always_retry`] apply to a marked request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonIdempotent;

/// Delay before retry `n` is `min(initial * multiplier^n, max)`, plus up to
/// 25% jitter when enabled.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_secs(20))
    }
}

impl ExponentialBackoff {
    /// Doubling backoff with jitter between `initial` and `max`.
    #[must_use]
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            multiplier: 2.0,
            jitter: true,
        }
    }

    /// Millisecond delays without jitter, for tests against mock servers.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            jitter: false,
            ..Self::new(Duration::from_millis(1), Duration::from_millis(100))
        }
    }
}

/// Which failures are retried, how often and how far apart.
///
/// Triggers in `always_retry` apply to every method. Triggers in
/// `idempotent_retry` apply only to idempotent methods, so a `POST` such as
/// `StopContact` is not replayed after the connection dropped mid-call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: usize,
    pub backoff: ExponentialBackoff,
    pub always_retry: HashSet<RetryTrigger>,
    pub idempotent_retry: HashSet<RetryTrigger>,
    /// Use the backoff even when the service sends `Retry-After`.
    pub ignore_retry_after: bool,
    /// Bytes read off a failed response before the retry, so its connection
    /// goes back to the pool.
    pub retry_response_drain_limit: usize,
}

pub const DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT: usize = 64 * 1024;

impl Default for RetryConfig {
    fn default() -> Self {
        Self::with_max_retries(3)
    }
}

impl RetryConfig {
    /// Default triggers with `max_retries` retries.
    #[must_use]
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self {
            max_retries,
            backoff: ExponentialBackoff::default(),
            always_retry: HashSet::from([RetryTrigger::THROTTLED]),
            idempotent_retry: HashSet::from([
                RetryTrigger::TransportError,
                RetryTrigger::Timeout,
                RetryTrigger::REQUEST_TIMEOUT,
                RetryTrigger::INTERNAL_ERROR,
                RetryTrigger::BAD_GATEWAY,
                RetryTrigger::UNAVAILABLE,
                RetryTrigger::GATEWAY_TIMEOUT,
            ]),
            ignore_retry_after: false,
            retry_response_drain_limit: DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT,
        }
    }

    #[must_use]
    pub fn should_retry(&self, trigger: RetryTrigger, method: &Method) -> bool {
        self.always_retry.contains(&trigger)
            || (self.idempotent_retry.contains(&trigger) && is_idempotent_method(method))
    }

    /// [`should_retry`](Self::should_retry), honouring a [`NonIdempotent`]
    /// marker in the request's extensions.
    #[must_use]
    pub fn should_retry_request(
        &self,
        trigger: RetryTrigger,
        method: &Method,
        extensions: &Extensions,
    ) -> bool {
        if extensions.get::<NonIdempotent>().is_some() {
            self.always_retry.contains(&trigger)
        } else {
            self.should_retry(trigger, method)
        }
    }
}

/// Trust anchors for server certificates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Bundled Mozilla roots (`webpki-roots`).
    #[default]
    WebPki,
    /// The operating system's certificate store.
    Native,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// Plain `http://` is accepted too. Local mock servers only.
    AllowInsecureHttp,
}

/// Settings of one [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per attempt.
    pub request_timeout: Duration,
    /// Across all attempts and backoff sleeps; `None` for no deadline.
    pub total_timeout: Option<Duration>,
    /// Largest response body read into memory.
    pub max_body_size: usize,
    pub user_agent: String,
    /// `None` sends each request once.
    pub retry: Option<RetryConfig>,
    /// Calls in flight before new ones are shed with
    /// [`HttpError::Overloaded`](crate::HttpError::Overloaded); `None` for no limit.
    pub max_concurrent_requests: Option<usize>,
    pub transport: TransportSecurity,
    pub tls_roots: TlsRootConfig,
    /// Open an `outgoing_http` span per request.
    pub trace_requests: bool,
    pub buffer_capacity: usize,
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            total_timeout: None,
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: Some(RetryConfig::default()),
            max_concurrent_requests: Some(100),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::WebPki,
            trace_requests: true,
            buffer_capacity: BUFFER_CAPACITY,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}
