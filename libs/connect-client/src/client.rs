//! The client facade.

use std::fmt;
use std::sync::Arc;

use connect_auth::{
    ChainProvider, HttpClientBuilderExt, ProvideCredentials, SharedCredentialsProvider,
};
use connect_http::{HttpClient, HttpClientBuilder, RetryConfig, TlsRootConfig};
use futures_core::Stream;

use crate::config::{ConnectConfig, StaticCredentialsConfig};
use crate::dispatcher::{CallOptions, Dispatcher, ResponseMetadata};
use crate::error::ConnectError;
use crate::metrics::{ClientMetrics, NoOpMetrics};
use crate::operation::Operation;
use crate::paginator::{ItemsPager, Page, PagerError, PagesPager, Paginated};

/// Signing name of the service.
pub const SERVICE_NAME: &str = "connect";

/// Async client of the contact-center service.
///
/// Cheap to clone; clones share the transport, credentials provider and
/// metrics sink. Every operation has a `snake_case` method, e.g.
/// [`create_queue`](Self::create_queue); [`invoke`](Self::invoke) calls any
/// [`Operation`] generically.
///
/// ```rust,ignore
/// use connect_client::{ConnectClient, ConnectConfig};
/// use connect_client::model::CreateQueueRequest;
///
/// let client = ConnectClient::builder()
///     .config(ConnectConfig::load(None)?)
///     .build()?;
///
/// let out = client
///     .create_queue(&CreateQueueRequest {
///         instance_id: "inst-1".into(),
///         name: "Support".into(),
///         hours_of_operation_id: "hoo-1".into(),
///         ..Default::default()
///     })
///     .await?;
/// ```
#[derive(Clone)]
pub struct ConnectClient {
    dispatcher: Dispatcher,
    config: Arc<ConnectConfig>,
}

impl fmt::Debug for ConnectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectClient")
            .field("endpoint", &self.dispatcher.endpoint)
            .field("region", &self.config.region)
            .field("credentials", &self.dispatcher.credentials.name())
            .finish_non_exhaustive()
    }
}

impl ConnectClient {
    #[must_use]
    pub fn builder() -> ConnectClientBuilder {
        ConnectClientBuilder::new()
    }

    /// Build a client from configuration alone.
    ///
    /// # Errors
    /// See [`ConnectClientBuilder::build`].
    pub fn from_config(config: ConnectConfig) -> Result<Self, ConnectError> {
        Self::builder().config(config).build()
    }

    /// Call any operation.
    ///
    /// # Errors
    /// - [`ConnectError::MissingRequiredField`] / [`ConnectError::InvalidLabel`] before any I/O
    /// - [`ConnectError::Credentials`] if no credentials could be resolved
    /// - [`ConnectError::Transport`] on connect, TLS, timeout or overload failures
    /// - [`ConnectError::Service`] for any non-2xx response
    /// - [`ConnectError::Deserialize`] if a 2xx body is not the expected JSON
    pub async fn invoke<O: Operation>(&self, input: &O) -> Result<O::Output, ConnectError> {
        self.invoke_with_options(input, &CallOptions::default())
            .await
    }

    /// Like [`invoke`](Self::invoke), also returning the response's request id and status.
    ///
    /// # Errors
    /// Same as [`invoke`](Self::invoke).
    pub async fn invoke_with_metadata<O: Operation>(
        &self,
        input: &O,
    ) -> Result<(O::Output, ResponseMetadata), ConnectError> {
        self.dispatcher.invoke(input, &CallOptions::default()).await
    }

    /// Like [`invoke`](Self::invoke), with per-call overrides.
    ///
    /// # Errors
    /// Same as [`invoke`](Self::invoke).
    pub async fn invoke_with_options<O: Operation>(
        &self,
        input: &O,
        options: &CallOptions,
    ) -> Result<O::Output, ConnectError> {
        let (output, _) = self.dispatcher.invoke(input, options).await?;
        Ok(output)
    }

    /// Stream of output pages, following `NextToken` from `input`.
    #[must_use]
    pub fn pages<I>(&self, input: I) -> impl Stream<Item = Result<I::Output, PagerError>> + use<I>
    where
        I: Paginated + 'static,
    {
        let client = self.clone();
        PagesPager::new(input, move |request: I| {
            let client = client.clone();
            async move { client.invoke(&request).await }
        })
    }

    /// Stream of the items of every page, following `NextToken` from `input`.
    #[must_use]
    pub fn items<I>(
        &self,
        input: I,
    ) -> impl Stream<Item = Result<<I::Output as Page>::Item, PagerError>> + use<I>
    where
        I: Paginated + 'static,
    {
        let client = self.clone();
        ItemsPager::new(input, move |request: I| {
            let client = client.clone();
            async move { client.invoke(&request).await }
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Base URL calls are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.dispatcher.endpoint
    }
}

/// Builder for [`ConnectClient`].
pub struct ConnectClientBuilder {
    config: ConnectConfig,
    credentials: Option<SharedCredentialsProvider>,
    metrics: Option<Arc<dyn ClientMetrics>>,
    http: Option<HttpClient>,
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    allow_insecure_http: bool,
}

impl Default for ConnectClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ConnectConfig::default(),
            credentials: None,
            metrics: None,
            http: None,
            #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
            allow_insecure_http: false,
        }
    }

    #[must_use]
    pub fn config(mut self, config: ConnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Credentials source. Defaults to the environment, then the static
    /// credentials in the configuration.
    #[must_use]
    pub fn credentials_provider(mut self, provider: impl ProvideCredentials + 'static) -> Self {
        self.credentials = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn shared_credentials_provider(mut self, provider: SharedCredentialsProvider) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Metrics sink. Defaults to [`NoOpMetrics`].
    #[must_use]
    pub fn metrics(mut self, metrics: impl ClientMetrics + 'static) -> Self {
        self.metrics = Some(Arc::new(metrics));
        self
    }

    /// Use a pre-built transport instead of one derived from the configuration.
    ///
    /// The transport must sign requests, i.e. be built with
    /// [`with_sigv4`](connect_auth::HttpClientBuilderExt::with_sigv4); the
    /// timeout, retry and concurrency settings of the configuration are not
    /// applied to it.
    #[must_use]
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Permit a plain `http://` endpoint (local mocks only).
    ///
    /// Only available in debug builds or with the `allow-insecure-http` feature.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        self.allow_insecure_http = true;
        self
    }

    fn insecure_http_allowed(&self) -> bool {
        #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
        {
            self.allow_insecure_http
        }
        #[cfg(not(any(debug_assertions, feature = "allow-insecure-http")))]
        {
            false
        }
    }

    fn build_http(&self) -> Result<HttpClient, ConnectError> {
        let config = &self.config;
        let mut builder = HttpClientBuilder::new()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .retry(Some(RetryConfig::with_max_retries(config.max_retries)))
            .max_body_size(config.max_body_size)
            .max_concurrent_requests(config.max_concurrent_requests)
            .with_sigv4(&config.region, SERVICE_NAME);
        if let Some(total) = config.total_timeout {
            builder = builder.total_timeout(total);
        }
        if config.native_tls_roots {
            builder = builder.tls_roots(TlsRootConfig::Native);
        }
        #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
        if self.allow_insecure_http {
            builder = builder.allow_insecure_http();
        }
        Ok(builder.build()?)
    }

    /// # Errors
    /// - [`ConnectError::Config`] if the configuration does not validate
    /// - [`ConnectError::InvalidEndpoint`] for a plain `http://` endpoint
    ///   without [`allow_insecure_http`](Self::allow_insecure_http)
    /// - [`ConnectError::Transport`] if the transport cannot be built
    pub fn build(mut self) -> Result<ConnectClient, ConnectError> {
        self.config.validate()?;

        let endpoint = self.config.resolved_endpoint_str();
        if endpoint.starts_with("http://") && !self.insecure_http_allowed() {
            return Err(ConnectError::InvalidEndpoint {
                endpoint,
                reason: "plain http requires allow_insecure_http()".to_owned(),
            });
        }

        let http = match self.http.take() {
            Some(http) => http,
            None => self.build_http()?,
        };
        let credentials = self.credentials.unwrap_or_else(|| {
            let fallback = self
                .config
                .credentials
                .as_ref()
                .map(StaticCredentialsConfig::to_credentials);
            Arc::new(ChainProvider::default_chain(fallback))
        });
        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoOpMetrics));

        tracing::debug!(
            endpoint = %endpoint,
            region = %self.config.region,
            credentials = credentials.name(),
            "connect client built"
        );

        Ok(ConnectClient {
            dispatcher: Dispatcher {
                http,
                endpoint: endpoint.into(),
                credentials,
                metrics,
            },
            config: Arc::new(self.config),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use url::Url;

    #[tokio::test]
    async fn default_endpoint_follows_region() {
        let config = ConnectConfig {
            region: "eu-west-2".to_owned(),
            ..ConnectConfig::default()
        };
        let client = ConnectClient::from_config(config).unwrap();
        assert_eq!(client.endpoint(), "https://connect.eu-west-2.amazonaws.com");
        assert_eq!(client.region(), "eu-west-2");
    }

    #[tokio::test]
    async fn plain_http_endpoint_needs_opt_in() {
        let config = ConnectConfig {
            endpoint: Some(Url::parse("http://127.0.0.1:9/").unwrap()),
            ..ConnectConfig::default()
        };

        let err = ConnectClient::from_config(config.clone()).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidEndpoint { .. }));

        let client = ConnectClient::builder()
            .config(config)
            .allow_insecure_http()
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = ConnectConfig {
            region: String::new(),
            ..ConnectConfig::default()
        };
        let err = ConnectClient::from_config(config).unwrap_err();
        assert!(matches!(
            err,
            ConnectError::Config(crate::config::ConfigError::EmptyRegion)
        ));
    }
}
