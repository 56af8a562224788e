use std::fmt;
use std::time::{Duration, SystemTime};

use crate::secret::SecretString;

/// A set of AWS-style access credentials.
///
/// `Debug` shows the access key id and expiry only; the secret key and
/// session token are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
    expires_at: Option<SystemTime>,
    provider_name: &'static str,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<SecretString>,
        session_token: Option<String>,
        expires_at: Option<SystemTime>,
        provider_name: &'static str,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.map(SecretString::from),
            expires_at,
            provider_name,
        }
    }

    /// Long-lived key pair without a session token.
    pub fn from_keys(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<SecretString>,
    ) -> Self {
        Self::new(access_key_id, secret_access_key, None, None, "static")
    }

    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    #[must_use]
    pub fn secret_access_key(&self) -> &SecretString {
        &self.secret_access_key
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&SecretString> {
        self.session_token.as_ref()
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Name of the provider that produced these credentials.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// True when the credentials expire within `buffer` of `now`.
    /// Credentials without an expiry never expire.
    #[must_use]
    pub fn expires_within(&self, now: SystemTime, buffer: Duration) -> bool {
        self.expires_at
            .is_some_and(|at| at <= now.checked_add(buffer).unwrap_or(now))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider_name", &self.provider_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
