use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{Instrument, Level};

/// Tower layer that opens an `outgoing_http` span per logical request.
///
/// The span sits outside the retry layer, so every attempt of one request
/// shares it. Records `http.status_code` on completion and sets `error` for
/// 4xx/5xx statuses and transport failures. The query string is never logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceLayer;

impl TraceLayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TraceLayer {
    type Service = TraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceService { inner }
    }
}

#[derive(Clone, Debug)]
pub struct TraceService<S> {
    inner: S,
}

/// `scheme://authority/path` without the query.
fn loggable_url(uri: &http::Uri) -> String {
    format!(
        "{}://{}{}",
        uri.scheme_str().unwrap_or("https"),
        uri.authority().map_or("", http::uri::Authority::as_str),
        uri.path()
    )
}

impl<S, ResBody> Service<Request<Full<Bytes>>> for TraceService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: std::fmt::Display + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        let span = tracing::span!(
            Level::DEBUG,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %loggable_url(req.uri()),
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        // Call the instance that was poll_ready'd; keep a fresh clone for the next cycle.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let result = inner.call(req).instrument(span.clone()).await;

            match &result {
                Ok(response) => {
                    let status = response.status();
                    span.record("http.status_code", status.as_u16());
                    if status.is_client_error() || status.is_server_error() {
                        span.record("error", true);
                    }
                }
                Err(e) => {
                    span.record("error", true);
                    tracing::debug!(parent: &span, error = %e, "request failed");
                }
            }

            result
        })
    }
}
