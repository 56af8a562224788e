//! Shared execution path of every operation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use connect_auth::{Credentials, SharedCredentialsProvider};
use connect_http::{HttpClient, NonIdempotent};
use http::StatusCode;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ConnectError;
use crate::metrics::{CallMetricLabels, CallOutcome, CallPhase, ClientMetrics};
use crate::operation::Operation;
use crate::protocol::{REQUEST_ID_HEADER, marshal, parse_service_error, unmarshal};

/// Header carrying the per-call correlation id.
pub const INVOCATION_ID_HEADER: &str = "amz-sdk-invocation-id";

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Sign this call with these credentials instead of asking the provider.
    pub credentials: Option<Credentials>,
}

impl CallOptions {
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Details of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// `x-amzn-RequestId` of the response.
    pub request_id: Option<String>,
    pub status: StatusCode,
}

/// Transient state of one call.
///
/// Reports `ClientExecuteTime` and the outcome when dropped, so a call that
/// is cancelled mid-flight still counts as a client failure.
struct ExecutionContext<'a> {
    metrics: &'a dyn ClientMetrics,
    labels: CallMetricLabels,
    started: Instant,
    outcome: CallOutcome,
}

impl<'a> ExecutionContext<'a> {
    fn new(operation: &'static str, metrics: &'a dyn ClientMetrics) -> Self {
        Self {
            metrics,
            labels: CallMetricLabels::new(operation, Uuid::new_v4().to_string()),
            started: Instant::now(),
            outcome: CallOutcome::ClientFailure,
        }
    }

    fn record(&self, phase: CallPhase, elapsed: Duration) {
        self.metrics.record_timing(phase, elapsed, &self.labels);
    }

    fn timed<T>(&self, phase: CallPhase, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.record(phase, started.elapsed());
        out
    }
}

impl Drop for ExecutionContext<'_> {
    fn drop(&mut self) {
        self.record(CallPhase::ClientExecute, self.started.elapsed());
        self.metrics.record_outcome(self.outcome, &self.labels);
    }
}

/// Resolves credentials, sends the marshalled request and routes the
/// response to the unmarshaller or the error chain.
#[derive(Clone)]
pub struct Dispatcher {
    pub http: HttpClient,
    pub endpoint: Arc<str>,
    pub credentials: SharedCredentialsProvider,
    pub metrics: Arc<dyn ClientMetrics>,
}

impl Dispatcher {
    pub async fn invoke<O: Operation>(
        &self,
        input: &O,
        options: &CallOptions,
    ) -> Result<(O::Output, ResponseMetadata), ConnectError> {
        let operation = O::descriptor().name;
        let mut ctx = ExecutionContext::new(operation, self.metrics.as_ref());
        let span = tracing::debug_span!(
            "connect.invoke",
            operation,
            correlation_id = %ctx.labels.correlation_id,
        );

        self.execute(input, options, &mut ctx).instrument(span).await
    }

    async fn execute<O: Operation>(
        &self,
        input: &O,
        options: &CallOptions,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(O::Output, ResponseMetadata), ConnectError> {
        let wire = ctx.timed(CallPhase::RequestMarshall, || marshal(input))?;

        let started = Instant::now();
        let credentials = match &options.credentials {
            Some(credentials) => credentials.clone(),
            None => self.credentials.provide_credentials().await?,
        };
        ctx.record(CallPhase::CredentialsRequest, started.elapsed());

        let url = format!("{}{}", self.endpoint, wire.path_and_query);
        let mut request = self
            .http
            .request(wire.method, &url)
            .header(INVOCATION_ID_HEADER, &ctx.labels.correlation_id)
            .headers(wire.headers)
            .extension(credentials);
        if !O::descriptor().idempotent {
            request = request.extension(NonIdempotent);
        }
        if let Some(body) = wire.body {
            request = request.body_bytes(body);
        }

        let started = Instant::now();
        let response = request.send().await?;
        let (status, headers, body) = response.into_parts().await?;
        ctx.record(CallPhase::HttpRequest, started.elapsed());

        let metadata = ResponseMetadata {
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            status,
        };
        if let Some(request_id) = &metadata.request_id {
            ctx.labels.request_id = Some(request_id.clone());
        }

        if !status.is_success() {
            let fault = parse_service_error(status, &headers, &body);
            tracing::warn!(
                status = status.as_u16(),
                code = %fault.code,
                request_id = ?fault.request_id,
                "service returned a fault"
            );
            ctx.labels.error_code = Some(fault.code.clone());
            ctx.outcome = CallOutcome::ServiceFault;
            return Err(ConnectError::Service(fault));
        }

        let output = ctx.timed(CallPhase::ResponseUnmarshall, || unmarshal::<O>(&body))?;
        tracing::debug!(
            status = status.as_u16(),
            request_id = ?metadata.request_id,
            "call succeeded"
        );
        ctx.outcome = CallOutcome::Success;
        Ok((output, metadata))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        timings: Mutex<Vec<CallPhase>>,
        outcomes: Mutex<Vec<CallOutcome>>,
    }

    impl ClientMetrics for Recording {
        fn record_timing(&self, phase: CallPhase, _elapsed: Duration, _labels: &CallMetricLabels) {
            self.timings.lock().unwrap().push(phase);
        }

        fn record_outcome(&self, outcome: CallOutcome, _labels: &CallMetricLabels) {
            self.outcomes.lock().unwrap().push(outcome);
        }
    }

    #[test]
    fn dropped_context_reports_client_failure() {
        let metrics = Recording::default();
        {
            let ctx = ExecutionContext::new("DescribeQueue", &metrics);
            ctx.timed(CallPhase::RequestMarshall, || ());
        }
        assert_eq!(
            *metrics.timings.lock().unwrap(),
            vec![CallPhase::RequestMarshall, CallPhase::ClientExecute]
        );
        assert_eq!(
            *metrics.outcomes.lock().unwrap(),
            vec![CallOutcome::ClientFailure]
        );
    }

    #[test]
    fn correlation_ids_are_unique_uuids() {
        let metrics = Recording::default();
        let a = ExecutionContext::new("A", &metrics);
        let b = ExecutionContext::new("B", &metrics);
        assert_ne!(a.labels.correlation_id, b.labels.correlation_id);
        assert!(Uuid::parse_str(&a.labels.correlation_id).is_ok());
    }
}
