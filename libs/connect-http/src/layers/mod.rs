//! Tower layers composed by [`HttpClientBuilder`](crate::HttpClientBuilder).
//!
//! - [`UserAgentLayer`] sets or extends the `User-Agent` header
//! - [`RetryLayer`] retries with exponential backoff and jitter
//! - [`TraceLayer`] wraps each logical request in a tracing span

mod retry;
mod trace;
mod user_agent;

pub use retry::{RETRY_ATTEMPT_HEADER, RetryLayer, RetryService};
pub use trace::{TraceLayer, TraceService};
pub use user_agent::{UserAgentLayer, UserAgentService};
