use std::time::Duration;

use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::buffer::Buffer;
use tower::limit::ConcurrencyLimitLayer;
use tower::load_shed::LoadShedLayer;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

use crate::client::HttpClient;
use crate::config::{HttpClientConfig, RetryConfig, TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use crate::layers::{RetryLayer, TraceLayer, UserAgentLayer};
use crate::response::ResponseBody;
use crate::tls;

/// The stack below the retry layer, as seen by an auth layer.
///
/// [`HttpClientBuilder::with_auth_layer`] receives this service and returns
/// a wrapped one.
pub type InnerService =
    BoxCloneService<http::Request<Full<Bytes>>, http::Response<ResponseBody>, HttpError>;

type AuthWrap = Box<dyn FnOnce(InnerService) -> InnerService + Send>;

/// Assembles an [`HttpClient`].
///
/// Layers, outermost first:
///
/// ```text
/// Buffer → Trace → LoadShed + ConcurrencyLimit → Retry → [auth]
///        → Timeout → UserAgent → Decompression → hyper
/// ```
#[must_use]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    auth_layer: Option<AuthWrap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::with_config(HttpClientConfig::default())
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HttpClientConfig) -> Self {
        Self {
            config,
            auth_layer: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Deadline across every attempt of one call.
    pub fn total_timeout(mut self, timeout: Duration) -> Self {
        self.config.total_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// `None` turns retries off.
    pub fn retry(mut self, retry: Option<RetryConfig>) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// `None` lifts the limit.
    pub fn max_concurrent_requests(mut self, max: Option<usize>) -> Self {
        self.config.max_concurrent_requests = max;
        self
    }

    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Accept `http://` URLs. Debug builds or the `allow-insecure-http` feature only.
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    pub fn trace_requests(mut self, enabled: bool) -> Self {
        self.config.trace_requests = enabled;
        self
    }

    /// Wrap the stack just inside the retry layer, so the wrapper sees every
    /// attempt. Calling this twice keeps the second wrapper.
    pub fn with_auth_layer(
        mut self,
        wrap: impl FnOnce(InnerService) -> InnerService + Send + 'static,
    ) -> Self {
        self.auth_layer = Some(Box::new(wrap));
        self
    }

    /// # Errors
    /// - [`HttpError::Tls`] if no root certificates could be loaded
    /// - [`HttpError::InvalidHeaderValue`] for a user agent that is not a valid header
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let Self { config, auth_layer } = self;

        if config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                target: "connect_http::security",
                "plain http enabled; traffic to http:// endpoints is not encrypted"
            );
        }

        let attempt_timeout = config.request_timeout;
        let connector = https_connector(config.tls_roots, config.transport)?;

        let mut pool = Client::builder(TokioExecutor::new());
        pool.pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(idle) = config.pool_idle_timeout {
            pool.pool_idle_timeout(idle);
        }
        let hyper_client = pool.build::<_, Full<Bytes>>(connector);

        let mut service: InnerService = ServiceBuilder::new()
            .layer(TimeoutLayer::new(attempt_timeout))
            .layer(UserAgentLayer::try_new(&config.user_agent)?)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_body)
            .map_err(move |err: BoxError| {
                if err.is::<tower::timeout::error::Elapsed>() {
                    HttpError::Timeout(attempt_timeout)
                } else {
                    unbox_error(err)
                }
            })
            .boxed_clone();

        if let Some(wrap) = auth_layer {
            service = wrap(service);
        }

        if let Some(retry) = config.retry {
            service = ServiceBuilder::new()
                .layer(RetryLayer::with_total_timeout(retry, config.total_timeout))
                .service(service)
                .boxed_clone();
        }

        if let Some(limit) = config.max_concurrent_requests {
            service = ServiceBuilder::new()
                .layer(LoadShedLayer::new())
                .layer(ConcurrencyLimitLayer::new(limit.max(1)))
                .service(service)
                .map_err(|err: BoxError| {
                    if err.is::<tower::load_shed::error::Overloaded>() {
                        HttpError::Overloaded
                    } else {
                        unbox_error(err)
                    }
                })
                .boxed_clone();
        }

        if config.trace_requests {
            service = ServiceBuilder::new()
                .layer(TraceLayer::new())
                .service(service)
                .boxed_clone();
        }

        Ok(HttpClient {
            service: Buffer::new(service, config.buffer_capacity.max(1)),
            max_body_size: config.max_body_size,
            transport_security: config.transport,
        })
    }
}

/// Recover an [`HttpError`] boxed by a tower layer.
fn unbox_error(err: BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(err) => *err,
        Err(other) => HttpError::Transport(other),
    }
}

fn box_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<BoxError>,
{
    response.map(|body| body.map_err(Into::into).boxed())
}

fn https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = match roots {
        TlsRootConfig::WebPki => HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(tls::get_crypto_provider())
            .map_err(|e| HttpError::Tls(Box::new(e)))?,
        TlsRootConfig::Native => HttpsConnectorBuilder::new().with_tls_config(
            tls::native_roots_client_config().map_err(|e| HttpError::Tls(Box::new(e)))?,
        ),
    };

    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => builder.https_or_http().enable_all_versions(),
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions(),
    };
    Ok(connector.build())
}
