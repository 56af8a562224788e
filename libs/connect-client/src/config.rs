//! Client configuration, loadable through figment.

use std::path::Path;
use std::time::Duration;

use connect_auth::{Credentials, SecretString};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Key under which an application-wide figment holds this section.
pub const CONFIG_KEY: &str = "connect";

/// Prefix of environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "CONNECT__";

/// Default User-Agent of the service client.
pub const DEFAULT_USER_AGENT: &str = concat!("connect-client/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    #[error("region must not be empty")]
    EmptyRegion,

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("endpoint '{0}' must use http or https")]
    UnsupportedScheme(Url),

    #[error("endpoint '{0}' has no host")]
    MissingHost(Url),

    #[error("static credentials need both access_key_id and secret_access_key")]
    IncompleteCredentials,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Static credentials given in configuration.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticCredentialsConfig {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl std::fmt::Debug for StaticCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StaticCredentialsConfig {
    #[must_use]
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            self.session_token
                .as_ref()
                .map(|token| token.expose().to_owned()),
            None,
            "ConfigStatic",
        )
    }
}

/// Connection, retry and identity settings of a [`ConnectClient`](crate::ConnectClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectConfig {
    /// Signing region, also used for the default endpoint.
    pub region: String,

    /// Endpoint override; `https://connect.{region}.amazonaws.com` when unset.
    pub endpoint: Option<Url>,

    pub user_agent: String,

    /// Per-attempt timeout.
    #[serde(with = "crate::humantime_serde")]
    pub request_timeout: Duration,

    /// Deadline across all attempts and backoff delays.
    #[serde(with = "crate::humantime_serde::option")]
    pub total_timeout: Option<Duration>,

    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: usize,

    /// In-flight request cap; excess calls fail fast as overloaded.
    pub max_concurrent_requests: Option<usize>,

    /// Maximum response body size in bytes.
    pub max_body_size: usize,

    /// Trust the OS certificate store instead of the bundled Mozilla roots.
    pub native_tls_roots: bool,

    /// Static credentials. Never serialized back out.
    #[serde(skip_serializing)]
    pub credentials: Option<StaticCredentialsConfig>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            endpoint: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_timeout: Duration::from_secs(30),
            total_timeout: None,
            max_retries: 3,
            max_concurrent_requests: Some(100),
            max_body_size: 10 * 1024 * 1024,
            native_tls_roots: false,
            credentials: None,
        }
    }
}

impl ConnectConfig {
    /// Extract the `connect` section of an application figment.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] on malformed values and any validation error.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = if figment.contains(CONFIG_KEY) {
            figment.extract_inner(CONFIG_KEY)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load defaults, then an optional YAML file, then `CONNECT__*` variables.
    ///
    /// `CONNECT__REGION=eu-west-2` overrides `region`;
    /// `CONNECT__CREDENTIALS__ACCESS_KEY_ID=...` sets a nested key.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if the file or a variable is malformed,
    /// and any validation error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        tracing::debug!(
            region = %config.region,
            endpoint = %config.resolved_endpoint_str(),
            "connect configuration loaded"
        );
        Ok(config)
    }

    /// # Errors
    /// Rejects an empty region, zero timeouts or limits, non-HTTP(S)
    /// endpoints and half-filled static credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                field: "request_timeout",
            });
        }
        if self.total_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroValue {
                field: "total_timeout",
            });
        }
        if self.max_concurrent_requests == Some(0) {
            return Err(ConfigError::ZeroValue {
                field: "max_concurrent_requests",
            });
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::ZeroValue {
                field: "max_body_size",
            });
        }
        if let Some(endpoint) = &self.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(ConfigError::UnsupportedScheme(endpoint.clone()));
            }
            if endpoint.host_str().is_none_or(str::is_empty) {
                return Err(ConfigError::MissingHost(endpoint.clone()));
            }
        }
        if let Some(creds) = &self.credentials
            && (creds.access_key_id.is_empty() || creds.secret_access_key.is_empty())
        {
            return Err(ConfigError::IncompleteCredentials);
        }
        Ok(())
    }

    /// Endpoint calls are sent to, without a trailing slash.
    #[must_use]
    pub fn resolved_endpoint_str(&self) -> String {
        match &self.endpoint {
            Some(url) => url.as_str().trim_end_matches('/').to_owned(),
            None => format!("https://connect.{}.amazonaws.com", self.region),
        }
    }
}
