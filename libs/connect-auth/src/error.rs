use thiserror::Error;

/// Errors produced while resolving credentials.
///
/// Secret material never appears in the formatted output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialsError {
    /// The provider has no credentials to offer; a chain moves on to the next one.
    #[error("credentials not loaded: {0}")]
    NotLoaded(String),

    /// Credentials were found but are malformed (e.g. an empty secret).
    #[error("invalid credentials configuration: {0}")]
    InvalidConfiguration(String),

    /// The provider returned credentials that have already expired.
    #[error("credentials from {provider} have expired")]
    Expired { provider: &'static str },

    /// The underlying source failed (network, IPC, ...).
    #[error("credentials provider {provider} failed: {source}")]
    ProviderError {
        provider: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CredentialsError {
    /// Build a [`CredentialsError::ProviderError`] from any error type.
    pub fn provider_error(
        provider: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ProviderError {
            provider,
            source: source.into(),
        }
    }
}

/// Errors produced while computing a SigV4 signature.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SigningError {
    /// Neither a `Host` header nor a URI authority is available.
    #[error("request has no host to sign")]
    MissingHost,

    /// A header taking part in the signature is not visible ASCII.
    #[error("header '{0}' has a value that cannot be signed")]
    UnsignableHeader(String),

    /// The computed signature headers could not be encoded.
    #[error("failed to encode '{name}' header")]
    InvalidHeaderValue {
        name: &'static str,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}
