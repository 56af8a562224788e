//! Root certificate loading and rustls configuration.

use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// OS root certificates, loaded once per process. Empty when none were found.
static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum TlsSetupError {
    #[error("no native root CA certificates found in the OS certificate store")]
    NoNativeRoots,

    #[error("none of the {found} native root CA certificates could be parsed")]
    NoParsableRoots { found: usize },

    #[error("failed to set TLS protocol versions: {0}")]
    ProtocolVersions(#[from] rustls::Error),
}

fn load_native_roots() -> Vec<CertificateDer<'static>> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        tracing::warn!(error = %err, "error loading native root certificate");
    }

    if loaded.certs.is_empty() {
        tracing::warn!("no native root CA certificates found");
    } else {
        tracing::debug!(count = loaded.certs.len(), "loaded native root certificates");
    }
    loaded.certs
}

pub fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS.get_or_init(load_native_roots).as_slice()
}

/// Crypto provider for TLS connections.
///
/// Uses the process-wide default when one is installed, otherwise an
/// aws-lc-rs provider that is not installed globally.
pub fn get_crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// rustls `ClientConfig` trusting the OS root store.
///
/// # Errors
///
/// Fails at client construction, not at handshake time, when the OS store is
/// empty or no certificate in it parses.
pub fn native_roots_client_config() -> Result<rustls::ClientConfig, TlsSetupError> {
    let certs = native_root_certs();
    if certs.is_empty() {
        return Err(TlsSetupError::NoNativeRoots);
    }

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "some native root certificates could not be parsed");
    }
    if added == 0 {
        return Err(TlsSetupError::NoParsableRoots { found: certs.len() });
    }

    let config = rustls::ClientConfig::builder_with_provider(get_crypto_provider())
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}
