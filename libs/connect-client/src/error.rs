use std::fmt;

use connect_auth::CredentialsError;
use connect_http::HttpError;
use thiserror::Error;

use crate::config::ConfigError;

/// Category of a server-declared fault.
///
/// Resolved from the error discriminator (`x-amzn-ErrorType`, `__type` or
/// `code`) by [`FaultKind::from_code`]. Discriminators this client does not
/// know map to [`FaultKind::Unknown`]; the raw code stays on [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FaultKind {
    AccessDenied,
    ContactNotFound,
    DestinationNotAllowed,
    DuplicateResource,
    Idempotency,
    InternalService,
    InvalidParameter,
    InvalidRequest,
    LimitExceeded,
    OutboundContactNotPermitted,
    PropertyValidation,
    ResourceConflict,
    ResourceInUse,
    ResourceNotFound,
    ResourceNotReady,
    ServiceQuotaExceeded,
    Throttling,
    UserNotFound,
    Unknown,
}

/// Ordered discriminator registry; the first matching entry wins.
pub const FAULT_REGISTRY: &[(&str, FaultKind)] = &[
    ("AccessDeniedException", FaultKind::AccessDenied),
    ("ContactNotFoundException", FaultKind::ContactNotFound),
    ("DestinationNotAllowedException", FaultKind::DestinationNotAllowed),
    ("DuplicateResourceException", FaultKind::DuplicateResource),
    ("IdempotencyException", FaultKind::Idempotency),
    ("InternalServiceException", FaultKind::InternalService),
    ("InvalidParameterException", FaultKind::InvalidParameter),
    ("InvalidRequestException", FaultKind::InvalidRequest),
    ("LimitExceededException", FaultKind::LimitExceeded),
    ("OutboundContactNotPermittedException", FaultKind::OutboundContactNotPermitted),
    ("PropertyValidationException", FaultKind::PropertyValidation),
    ("ResourceConflictException", FaultKind::ResourceConflict),
    ("ResourceInUseException", FaultKind::ResourceInUse),
    ("ResourceNotFoundException", FaultKind::ResourceNotFound),
    ("ResourceNotReadyException", FaultKind::ResourceNotReady),
    ("ServiceQuotaExceededException", FaultKind::ServiceQuotaExceeded),
    ("ThrottlingException", FaultKind::Throttling),
    ("UserNotFoundException", FaultKind::UserNotFound),
];

impl FaultKind {
    /// Look up a discriminator in [`FAULT_REGISTRY`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        FAULT_REGISTRY
            .iter()
            .find(|(registered, _)| *registered == code)
            .map_or(Self::Unknown, |(_, kind)| *kind)
    }

    /// Registered discriminator, `None` for [`FaultKind::Unknown`].
    #[must_use]
    pub fn code(self) -> Option<&'static str> {
        FAULT_REGISTRY
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(code, _)| *code)
    }

    /// Hint that the same call may succeed later. The client never acts on it.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Throttling | Self::InternalService | Self::ResourceNotReady
        )
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().unwrap_or("Unknown"))
    }
}

/// Which side a fault is attributed to, from the HTTP status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Client,
    Service,
}

/// A fault returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    pub kind: FaultKind,
    /// Raw discriminator as received; empty if the response carried none.
    pub code: String,
    pub message: Option<String>,
    pub status: http::StatusCode,
    pub request_id: Option<String>,
    /// Remaining members of the error payload (e.g. `PropertyList`).
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ServiceError {
    #[must_use]
    pub fn origin(&self) -> ErrorOrigin {
        if self.status.is_server_error() {
            ErrorOrigin::Service
        } else {
            ErrorOrigin::Client
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = if self.code.is_empty() {
            "Unknown"
        } else {
            &self.code
        };
        write!(f, "{code} (HTTP {})", self.status.as_u16())?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " [request id: {request_id}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

/// Errors returned by [`ConnectClient`](crate::ConnectClient) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectError {
    #[error("{operation}: required field '{field}' is missing")]
    MissingRequiredField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("{operation}: path label '{label}' must be a non-empty scalar")]
    InvalidLabel {
        operation: &'static str,
        label: String,
    },

    #[error("{operation}: failed to serialize input")]
    Serialize {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: failed to deserialize response")]
    Deserialize {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to resolve credentials")]
    Credentials(#[from] CredentialsError),

    #[error("transport error")]
    Transport(#[from] HttpError),

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid client configuration")]
    Config(#[from] ConfigError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

impl ConnectError {
    /// Fault kind of a server-declared error.
    #[must_use]
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Self::Service(e) => Some(e.kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }

    /// Request id assigned by the service, when it answered at all.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.service_error()?.request_id.as_deref()
    }

    /// Hint that retrying the call later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.kind.is_retryable(),
            Self::Transport(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn service_error(kind: FaultKind, status: u16) -> ServiceError {
        ServiceError {
            kind,
            code: kind.code().unwrap_or_default().to_owned(),
            message: Some("boom".to_owned()),
            status: http::StatusCode::from_u16(status).unwrap(),
            request_id: Some("req-1".to_owned()),
            fields: serde_json::Map::new(),
        }
    }

    #[test]
    fn registry_round_trips_every_kind() {
        for (code, kind) in FAULT_REGISTRY {
            assert_eq!(FaultKind::from_code(code), *kind);
            assert_eq!(kind.code(), Some(*code));
        }
    }

    #[test]
    fn registry_has_no_duplicates() {
        let codes: HashSet<_> = FAULT_REGISTRY.iter().map(|(c, _)| *c).collect();
        let kinds: HashSet<_> = FAULT_REGISTRY.iter().map(|(_, k)| *k).collect();
        assert_eq!(codes.len(), FAULT_REGISTRY.len());
        assert_eq!(kinds.len(), FAULT_REGISTRY.len());
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(FaultKind::from_code("BrandNewException"), FaultKind::Unknown);
        assert_eq!(FaultKind::from_code(""), FaultKind::Unknown);
        assert_eq!(FaultKind::Unknown.code(), None);
    }

    #[test]
    fn origin_follows_status_class() {
        assert_eq!(
            service_error(FaultKind::InvalidParameter, 400).origin(),
            ErrorOrigin::Client
        );
        assert_eq!(
            service_error(FaultKind::InternalService, 500).origin(),
            ErrorOrigin::Service
        );
    }

    #[test]
    fn helpers_expose_service_details() {
        let err = ConnectError::from(service_error(FaultKind::Throttling, 429));
        assert_eq!(err.fault_kind(), Some(FaultKind::Throttling));
        assert_eq!(err.request_id(), Some("req-1"));
        assert!(err.is_retryable());

        let err = ConnectError::from(service_error(FaultKind::ResourceNotFound, 404));
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_retryability_follows_http_error() {
        assert!(ConnectError::from(HttpError::Overloaded).is_retryable());
        assert!(!ConnectError::from(HttpError::ServiceClosed).is_retryable());
        assert_eq!(ConnectError::from(HttpError::Overloaded).fault_kind(), None);
    }

    #[test]
    fn display_includes_code_message_and_request_id() {
        let err = service_error(FaultKind::ResourceNotFound, 404);
        assert_eq!(
            err.to_string(),
            "ResourceNotFoundException (HTTP 404): boom [request id: req-1]"
        );
    }
}
