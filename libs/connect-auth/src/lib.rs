#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Credentials and request signing for the contact-center service client.
//!
//! - [`ProvideCredentials`] and its implementations resolve [`Credentials`]
//! - [`signer`] computes AWS Signature Version 4
//! - [`SigV4Layer`] signs requests inside the `connect-http` tower stack,
//!   installed with [`HttpClientBuilderExt::with_sigv4`]

pub mod builder_ext;
pub mod credentials;
pub mod error;
pub mod layer;
pub mod provider;
pub mod secret;
pub mod signer;

pub use builder_ext::HttpClientBuilderExt;
pub use credentials::Credentials;
pub use error::{CredentialsError, SigningError};
pub use layer::{SigV4Layer, SigV4Service};
pub use provider::{
    CachingProvider, ChainProvider, EnvironmentProvider, FnProvider, ProvideCredentials,
    SharedCredentialsProvider, StaticProvider,
};
pub use secret::SecretString;
