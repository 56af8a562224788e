//! Per-call metrics hooks.
//!
//! The dispatcher reports phase timings and one outcome per call through a
//! [`ClientMetrics`] sink. Backends (Prometheus, StatsD, ...) implement the
//! trait; [`NoOpMetrics`] is the default.

use std::time::Duration;

/// Timed phases of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    RequestMarshall,
    CredentialsRequest,
    HttpRequest,
    ResponseUnmarshall,
    /// The whole call, marshalling through unmarshalling.
    ClientExecute,
}

impl CallPhase {
    #[must_use]
    pub fn metric_name(self) -> &'static str {
        match self {
            Self::RequestMarshall => "RequestMarshallTime",
            Self::CredentialsRequest => "CredentialsRequestTime",
            Self::HttpRequest => "HttpRequestTime",
            Self::ResponseUnmarshall => "ResponseUnmarshallTime",
            Self::ClientExecute => "ClientExecuteTime",
        }
    }
}

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    /// The service answered with an error status.
    ServiceFault,
    /// Marshalling, credentials, transport or decoding failed, or the call
    /// was dropped before finishing.
    ClientFailure,
}

impl CallOutcome {
    #[must_use]
    pub fn metric_name(self) -> &'static str {
        match self {
            Self::Success => "connect.call.success",
            Self::ServiceFault => "connect.call.service_fault",
            Self::ClientFailure => "connect.call.client_failure",
        }
    }
}

/// Labels attached to every metric of one call.
#[derive(Default, Debug, Clone)]
pub struct CallMetricLabels {
    pub operation: &'static str,
    pub correlation_id: String,
    /// Service request id, once a response arrived.
    pub request_id: Option<String>,
    /// Fault discriminator, for service faults.
    pub error_code: Option<String>,
}

impl CallMetricLabels {
    #[must_use]
    pub fn new(operation: &'static str, correlation_id: impl Into<String>) -> Self {
        Self {
            operation,
            correlation_id: correlation_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }
}

/// Trait for metrics backends
pub trait ClientMetrics: Send + Sync {
    fn record_timing(&self, phase: CallPhase, elapsed: Duration, labels: &CallMetricLabels);

    fn record_outcome(&self, outcome: CallOutcome, labels: &CallMetricLabels);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy)]
pub struct NoOpMetrics;

impl ClientMetrics for NoOpMetrics {
    fn record_timing(&self, _phase: CallPhase, _elapsed: Duration, _labels: &CallMetricLabels) {}

    fn record_outcome(&self, _outcome: CallOutcome, _labels: &CallMetricLabels) {}
}

/// Logging-based metrics implementation (for debugging)
#[derive(Debug, Clone, Copy)]
pub struct LoggingMetrics;

impl ClientMetrics for LoggingMetrics {
    fn record_timing(&self, phase: CallPhase, elapsed: Duration, labels: &CallMetricLabels) {
        tracing::debug!(
            metric = phase.metric_name(),
            elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            operation = labels.operation,
            correlation_id = %labels.correlation_id,
            "call timing recorded"
        );
    }

    fn record_outcome(&self, outcome: CallOutcome, labels: &CallMetricLabels) {
        tracing::debug!(
            metric = outcome.metric_name(),
            operation = labels.operation,
            correlation_id = %labels.correlation_id,
            request_id = ?labels.request_id,
            error_code = ?labels.error_code,
            "call outcome recorded"
        );
    }
}
