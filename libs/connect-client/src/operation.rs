//! Static description of remote operations.

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FaultKind;

/// Wire binding of one remote operation.
#[derive(Debug)]
pub struct OperationDescriptor {
    /// Operation name as the service knows it, e.g. `CreateQueue`.
    pub name: &'static str,
    pub method: Method,
    /// Path template. `{Member}` is replaced by the percent-encoded member
    /// value; `{Member+}` keeps `/` separators.
    pub uri: &'static str,
    /// `(member, query key)` pairs, in the order they are appended.
    pub query: &'static [(&'static str, &'static str)],
    /// `(member, header name)` pairs.
    pub headers: &'static [(&'static str, &'static str)],
    /// Members that must be present and non-null.
    pub required: &'static [&'static str],
    /// Fault kinds the service documents for this operation.
    pub errors: &'static [FaultKind],
    /// Member filled with a fresh UUID when the caller leaves it out, so
    /// every attempt of one call carries the same token.
    pub idempotency_token: Option<&'static str>,
    /// `false` when a replay after a server or connection failure could act
    /// twice, whatever the method says.
    pub idempotent: bool,
    /// `false` when a successful response carries no body worth parsing.
    pub has_output: bool,
}

impl OperationDescriptor {
    /// Path labels in template order, with the greedy marker stripped.
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.uri.split('{').skip(1).filter_map(|part| {
            let raw = part.split_once('}')?.0;
            Some(match raw.strip_suffix('+') {
                Some(label) => (label, true),
                None => (raw, false),
            })
        })
    }
}

/// An operation input: serializes to the request members and names its
/// output type and descriptor.
pub trait Operation: Serialize + Send + Sync {
    type Output: DeserializeOwned + Default + Send + 'static;

    fn descriptor() -> &'static OperationDescriptor;
}

/// Declares the service model.
///
/// Each row emits a `static` descriptor, the [`Operation`] impl binding the
/// input to its output, and a facade method on
/// [`ConnectClient`](crate::ConnectClient). `SERVICE_MODEL` lists every row.
///
/// A row may name an `idempotency_token` member and opt out of replays with
/// `idempotent: false`.
macro_rules! service_model {
    (@token) => { None };
    (@token $token:literal) => { Some($token) };
    (@idempotent) => { true };
    (@idempotent $idempotent:literal) => { $idempotent };

    ($(
        $(#[$doc:meta])*
        $fn_name:ident / $static_name:ident: $input:ty => $output:ty {
            name: $name:literal,
            method: $method:ident,
            uri: $uri:literal,
            query: [$($qmember:literal => $qkey:literal),* $(,)?],
            required: [$($required:literal),* $(,)?],
            errors: [$($fault:ident),* $(,)?],
            $(idempotency_token: $token:literal,)?
            $(idempotent: $idempotent:literal,)?
            has_output: $has_output:literal $(,)?
        }
    )*) => {
        $(
            pub static $static_name: $crate::operation::OperationDescriptor =
                $crate::operation::OperationDescriptor {
                    name: $name,
                    method: ::http::Method::$method,
                    uri: $uri,
                    query: &[$(($qmember, $qkey)),*],
                    headers: &[],
                    required: &[$($required),*],
                    errors: &[$($crate::error::FaultKind::$fault),*],
                    idempotency_token: $crate::operation::service_model!(@token $($token)?),
                    idempotent: $crate::operation::service_model!(@idempotent $($idempotent)?),
                    has_output: $has_output,
                };

            impl $crate::operation::Operation for $input {
                type Output = $output;

                fn descriptor() -> &'static $crate::operation::OperationDescriptor {
                    &$static_name
                }
            }
        )*

        /// Every operation this client can call.
        pub static SERVICE_MODEL: &[&$crate::operation::OperationDescriptor] = &[$(&$static_name),*];

        impl $crate::client::ConnectClient {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                /// See [`ConnectError`](crate::ConnectError); service faults arrive as
                /// [`ConnectError::Service`](crate::ConnectError::Service).
                pub async fn $fn_name(
                    &self,
                    input: &$input,
                ) -> Result<$output, $crate::error::ConnectError> {
                    self.invoke(input).await
                }
            )*
        }
    };
}

pub(crate) use service_model;
