use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use tower::Service;
use tower::buffer::Buffer;

use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Handle to the buffered tower stack.
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Transport shared by every call of a service client.
///
/// Clones share the connection pool and the concurrency limit. The stack
/// sits behind a `tower::buffer::Buffer`, so a clone is a channel sender
/// and concurrent calls never wait on a lock.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("transport_security", &self.transport_security)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// A client with every default: TLS only, 30s attempts, three retries.
    ///
    /// # Errors
    /// [`HttpError::Tls`] if the root store cannot be loaded.
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a request to an absolute URL whose query is already encoded.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            method,
            url.to_owned(),
            self.transport_security,
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}

/// A `Buffer` error is either the stack's own [`HttpError`] or a dead worker.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    err.downcast::<HttpError>().map_or_else(
        |err| {
            tracing::error!(error = %err, "transport worker stopped; failing the call");
            HttpError::ServiceClosed
        },
        |err| *err,
    )
}

/// Reserve a buffer slot without waiting; a full buffer is [`HttpError::Overloaded`].
pub async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), HttpError> {
    let ready = std::future::poll_fn(|cx| Poll::Ready(service.poll_ready(cx))).await;
    match ready {
        Poll::Ready(Ok(())) => Ok(()),
        Poll::Ready(Err(err)) => Err(map_buffer_error(err)),
        Poll::Pending => Err(HttpError::Overloaded),
    }
}
