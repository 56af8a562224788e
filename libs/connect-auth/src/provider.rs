//! Credential providers.
//!
//! A provider resolves [`Credentials`] on demand. Providers compose: a
//! [`ChainProvider`] tries several sources in order and a
//! [`CachingProvider`] memoizes any provider until shortly before expiry.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::CredentialsError;

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Asynchronous source of credentials.
#[async_trait]
pub trait ProvideCredentials: Send + Sync + fmt::Debug {
    /// Resolve credentials, possibly suspending on I/O.
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError>;

    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;
}

/// Shared, type-erased provider handle.
pub type SharedCredentialsProvider = Arc<dyn ProvideCredentials>;

/// Always returns the same credentials.
#[derive(Clone, Debug)]
pub struct StaticProvider {
    credentials: Credentials,
}

impl StaticProvider {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ProvideCredentials for StaticProvider {
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
/// `AWS_SESSION_TOKEN` on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvironmentProvider;

impl EnvironmentProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read credentials from the process environment.
    ///
    /// Empty variables count as unset.
    ///
    /// # Errors
    /// `NotLoaded` when the key id is missing, `InvalidConfiguration` when
    /// the key id is present without a secret.
    pub fn from_env() -> Result<Credentials, CredentialsError> {
        from_lookup(|key| std::env::var(key).ok())
    }
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Credentials, CredentialsError> {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let access_key_id = var(ENV_ACCESS_KEY_ID)
        .ok_or_else(|| CredentialsError::NotLoaded(format!("{ENV_ACCESS_KEY_ID} is not set")))?;
    let secret = var(ENV_SECRET_ACCESS_KEY).ok_or_else(|| {
        CredentialsError::InvalidConfiguration(format!(
            "{ENV_ACCESS_KEY_ID} is set but {ENV_SECRET_ACCESS_KEY} is not"
        ))
    })?;

    Ok(Credentials::new(
        access_key_id,
        secret,
        var(ENV_SESSION_TOKEN),
        None,
        "environment",
    ))
}

#[async_trait]
impl ProvideCredentials for EnvironmentProvider {
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        Self::from_env()
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

/// Tries providers in order and returns the first credentials found.
///
/// A provider answering `NotLoaded` passes control to the next one; any
/// other error stops the chain.
#[derive(Clone, Debug, Default)]
pub struct ChainProvider {
    providers: Vec<SharedCredentialsProvider>,
}

impl ChainProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    #[must_use]
    pub fn or_else(mut self, provider: impl ProvideCredentials + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Environment first, then the given static credentials if any.
    #[must_use]
    pub fn default_chain(fallback: Option<Credentials>) -> Self {
        let chain = Self::new().or_else(EnvironmentProvider::new());
        match fallback {
            Some(credentials) => chain.or_else(StaticProvider::new(credentials)),
            None => chain,
        }
    }
}

#[async_trait]
impl ProvideCredentials for ChainProvider {
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        for provider in &self.providers {
            match provider.provide_credentials().await {
                Ok(credentials) => return Ok(credentials),
                Err(CredentialsError::NotLoaded(reason)) => {
                    tracing::debug!(provider = provider.name(), %reason, "provider had no credentials; trying next");
                }
                Err(e) => return Err(e),
            }
        }
        Err(CredentialsError::NotLoaded(
            "no provider in the chain returned credentials".to_owned(),
        ))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// Caches another provider's credentials until they near expiry.
///
/// Reads are lock-free. When a refresh is due, concurrent callers wait on a
/// single in-flight refresh instead of each calling the inner provider.
/// Credentials that arrive already inside the refresh buffer are served
/// until they actually expire.
pub struct CachingProvider {
    inner: SharedCredentialsProvider,
    cached: ArcSwapOption<CachedCredentials>,
    refresh_lock: tokio::sync::Mutex<()>,
    refresh_buffer: Duration,
}

#[derive(Debug)]
struct CachedCredentials {
    credentials: Credentials,
    /// `None` for credentials that never expire.
    refresh_at: Option<SystemTime>,
}

impl CachedCredentials {
    fn new(credentials: Credentials, now: SystemTime, buffer: Duration) -> Self {
        let refresh_at = credentials.expires_at().map(|expires_at| {
            expires_at
                .checked_sub(buffer)
                .filter(|at| *at > now)
                .unwrap_or(expires_at)
        });
        Self {
            credentials,
            refresh_at,
        }
    }

    fn is_fresh(&self, now: SystemTime) -> bool {
        self.refresh_at.is_none_or(|at| now < at)
    }
}

/// Credentials are refreshed this long before they expire.
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::from_secs(5 * 60);

impl CachingProvider {
    pub fn new(inner: impl ProvideCredentials + 'static) -> Self {
        Self::from_shared(Arc::new(inner))
    }

    #[must_use]
    pub fn from_shared(inner: SharedCredentialsProvider) -> Self {
        Self {
            inner,
            cached: ArcSwapOption::empty(),
            refresh_lock: tokio::sync::Mutex::new(()),
            refresh_buffer: DEFAULT_REFRESH_BUFFER,
        }
    }

    #[must_use]
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    fn fresh(&self) -> Option<Credentials> {
        self.cached
            .load_full()
            .filter(|cached| cached.is_fresh(SystemTime::now()))
            .map(|cached| cached.credentials.clone())
    }

    /// Drop the cached credentials so the next call refreshes.
    pub fn invalidate(&self) {
        self.cached.store(None);
    }
}

impl fmt::Debug for CachingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingProvider")
            .field("inner", &self.inner.name())
            .field("cached", &self.cached.load().is_some())
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}

#[async_trait]
impl ProvideCredentials for CachingProvider {
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        if let Some(credentials) = self.fresh() {
            return Ok(credentials);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(credentials) = self.fresh() {
            return Ok(credentials);
        }

        tracing::debug!(provider = self.inner.name(), "refreshing cached credentials");
        let credentials = self.inner.provide_credentials().await?;
        let now = SystemTime::now();
        if credentials.expires_within(now, Duration::ZERO) {
            return Err(CredentialsError::Expired {
                provider: self.inner.name(),
            });
        }
        if credentials.expires_within(now, self.refresh_buffer) {
            tracing::debug!(
                provider = self.inner.name(),
                "credentials arrived inside the refresh buffer; caching until expiry"
            );
        }
        self.cached.store(Some(Arc::new(CachedCredentials::new(
            credentials.clone(),
            now,
            self.refresh_buffer,
        ))));
        Ok(credentials)
    }

    fn name(&self) -> &'static str {
        "caching"
    }
}

/// Adapts an async closure into a provider.
///
/// Plugs in sources this crate does not ship, such as federation or an
/// instance-role endpoint.
pub struct FnProvider<F> {
    name: &'static str,
    f: F,
}

impl<F, Fut> FnProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credentials, CredentialsError>> + Send,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> ProvideCredentials for FnProvider<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credentials, CredentialsError>> + Send,
{
    async fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        (self.f)().await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
