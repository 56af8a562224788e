use tower::ServiceExt;

use crate::layer::SigV4Layer;

/// Extension trait adding SigV4 signing to [`connect_http::HttpClientBuilder`].
///
/// # Example
///
/// ```ignore
/// use connect_auth::HttpClientBuilderExt;
///
/// let client = HttpClientBuilder::new()
///     .with_sigv4("eu-west-2", "connect")
///     .build()?;
/// ```
pub trait HttpClientBuilderExt {
    /// Sign every request that carries [`Credentials`](crate::Credentials)
    /// in its extensions.
    #[must_use]
    fn with_sigv4(self, region: &str, service: &str) -> Self;
}

impl HttpClientBuilderExt for connect_http::HttpClientBuilder {
    fn with_sigv4(self, region: &str, service: &str) -> Self {
        let layer = SigV4Layer::new(region, service);
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }
}
