use crate::config::{ExponentialBackoff, RetryConfig, RetryTrigger};
use crate::error::HttpError;
use crate::response::{ResponseBody, parse_retry_after};
use bytes::Bytes;
use http::request::Parts;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tower::{Layer, Service, ServiceExt};

/// Header carrying the retry attempt number (1-indexed) on retried requests.
pub const RETRY_ATTEMPT_HEADER: &str = "X-Retry-Attempt";

/// Tower layer that retries failed attempts with exponential backoff and jitter.
///
/// Every layer below this one, including request signing, runs again for each
/// attempt, so each attempt carries fresh headers.
#[derive(Clone, Debug)]
pub struct RetryLayer {
    config: RetryConfig,
    total_timeout: Option<Duration>,
}

impl RetryLayer {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            total_timeout: None,
        }
    }

    /// Retry layer with a deadline covering all attempts and backoff sleeps
    #[must_use]
    pub fn with_total_timeout(config: RetryConfig, total_timeout: Option<Duration>) -> Self {
        Self {
            config,
            total_timeout,
        }
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            config: self.config.clone(),
            total_timeout: self.total_timeout,
        }
    }
}

/// Service produced by [`RetryLayer`].
///
/// Retries on `Err(HttpError)` and on retryable status codes. After retries
/// are exhausted the last response is returned as `Ok`, whatever its status.
/// A retried response body is drained (up to the configured limit) so the
/// connection can go back to the pool.
#[derive(Clone, Debug)]
pub struct RetryService<S> {
    inner: S,
    config: RetryConfig,
    total_timeout: Option<Duration>,
}

/// Deadline across all attempts of one request.
#[derive(Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    fn start(budget: Option<Duration>) -> Option<Self> {
        budget.map(|budget| Self {
            at: Instant::now() + budget,
            budget,
        })
    }

    fn check(&self) -> Result<(), HttpError> {
        if Instant::now() >= self.at {
            Err(HttpError::DeadlineExceeded(self.budget))
        } else {
            Ok(())
        }
    }

    /// Shorten `delay` to the time left, failing if nothing is left.
    fn clamp(&self, delay: Duration) -> Result<Duration, HttpError> {
        let remaining = self.at.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(HttpError::DeadlineExceeded(self.budget));
        }
        Ok(delay.min(remaining))
    }
}

/// Rebuild the request for `attempt` (0 is the first try) from preserved parts.
fn attempt_request(parts: &Parts, body: &Full<Bytes>, attempt: usize) -> Request<Full<Bytes>> {
    let mut req = Request::from_parts(parts.clone(), body.clone());
    if attempt > 0
        && let Ok(value) = HeaderValue::try_from(attempt.to_string())
    {
        req.headers_mut().insert(RETRY_ATTEMPT_HEADER, value);
    }
    req
}

impl<S> Service<Request<Full<Bytes>>> for RetryService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResponseBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        // Consume the instance that was poll_ready'd; keep a fresh clone for the next cycle.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config.clone();
        let total_timeout = self.total_timeout;

        let (parts, body) = req.into_parts();

        Box::pin(async move {
            let method = parts.method.clone();
            let host = parts
                .uri
                .authority()
                .map_or_else(|| "unknown".to_owned(), ToString::to_string);
            let deadline = Deadline::start(total_timeout);

            let mut attempt = 0usize;
            loop {
                if let Some(deadline) = &deadline {
                    deadline.check()?;
                }

                let mut svc = inner.clone();
                svc.ready().await?;
                let outcome = svc.call(attempt_request(&parts, &body, attempt)).await;
                let retries_left = attempt < config.max_retries;

                let delay = match outcome {
                    Ok(resp) => {
                        let status = resp.status().as_u16();
                        let trigger = RetryTrigger::Status(status);
                        if !retries_left
                            || !config.should_retry_request(trigger, &method, &parts.extensions)
                        {
                            return Ok(resp);
                        }

                        let retry_after = if config.ignore_retry_after {
                            None
                        } else {
                            parse_retry_after(resp.headers())
                        };
                        let delay = retry_after
                            .unwrap_or_else(|| calculate_backoff(&config.backoff, attempt));

                        drain_before_retry(resp, config.retry_response_drain_limit).await;

                        tracing::debug!(
                            retry = attempt + 1,
                            max_retries = config.max_retries,
                            status,
                            method = %method,
                            host = %host,
                            retry_after_used = retry_after.is_some(),
                            "retrying after status"
                        );
                        delay
                    }
                    Err(err) => {
                        let trigger = retry_trigger(&err);
                        if !retries_left
                            || !config.should_retry_request(trigger, &method, &parts.extensions)
                        {
                            return Err(err);
                        }

                        tracing::debug!(
                            retry = attempt + 1,
                            max_retries = config.max_retries,
                            error = %err,
                            trigger = ?trigger,
                            method = %method,
                            host = %host,
                            "retrying after error"
                        );
                        calculate_backoff(&config.backoff, attempt)
                    }
                };

                let delay = match &deadline {
                    Some(deadline) => deadline.clamp(delay)?,
                    None => delay,
                };
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        })
    }
}

/// Drain up to `limit` decompressed bytes so HTTP/1.1 can reuse the connection.
///
/// Bodies announced larger than the limit are dropped unread; the pool then
/// opens a new connection for the next attempt.
async fn drain_before_retry(response: Response<ResponseBody>, limit: usize) {
    let announced = response
        .headers()
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    if announced.is_some_and(|len| len > limit as u64) {
        tracing::trace!(?announced, limit, "skipping drain of large response body");
        return;
    }

    let mut body = std::pin::pin!(response.into_body());
    let mut drained = 0usize;
    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                drained += frame.data_ref().map_or(0, Bytes::len);
                if drained >= limit {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to drain response body before retry");
                break;
            }
        }
    }
}

fn retry_trigger(err: &HttpError) -> RetryTrigger {
    match err {
        HttpError::Transport(_) => RetryTrigger::TransportError,
        HttpError::Timeout(_) => RetryTrigger::Timeout,
        // Signing failures repeat identically on every attempt.
        _ => RetryTrigger::NonRetryable,
    }
}

/// Backoff before retry number `attempt + 1`.
///
/// `min(initial * multiplier^attempt, max)` plus up to 25% jitter. Non-finite
/// or negative settings fall back to sane values instead of panicking.
pub fn calculate_backoff(backoff: &ExponentialBackoff, attempt: usize) -> Duration {
    const MAX_BACKOFF_SECS: f64 = 86_400.0;

    let sanitize = |v: f64, fallback: f64| {
        if v.is_finite() && v >= 0.0 { v } else { fallback }
    };

    let multiplier = sanitize(backoff.multiplier, 1.0);
    let initial = sanitize(backoff.initial.as_secs_f64(), 0.0);
    let max = sanitize(backoff.max.as_secs_f64(), MAX_BACKOFF_SECS).min(MAX_BACKOFF_SECS);
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);

    let raw = initial * multiplier.powi(exponent);
    let secs = if raw.is_finite() {
        raw.clamp(0.0, max)
    } else {
        max
    };
    let delay = Duration::from_secs_f64(secs);

    if backoff.jitter {
        delay + delay.mul_f64(rand::rng().random_range(0.0..=0.25))
    } else {
        delay
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::NonIdempotent;
    use http::{Method, StatusCode};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy)]
    enum Fail {
        Transport,
        Signing,
    }

    type Scripted = Result<(StatusCode, Vec<(&'static str, &'static str)>), Fail>;

    /// Replays a fixed script of outcomes and records every request it sees.
    #[derive(Clone)]
    struct ScriptService {
        script: Arc<Mutex<VecDeque<Scripted>>>,
        seen: Arc<Mutex<Vec<Request<Full<Bytes>>>>>,
    }

    impl ScriptService {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Service<Request<Full<Bytes>>> for ScriptService {
        type Response = Response<ResponseBody>;
        type Error = HttpError;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            self.seen.lock().unwrap().push(req);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok((StatusCode::OK, Vec::new())));
            std::future::ready(match next {
                Ok((status, headers)) => {
                    let mut builder = Response::builder().status(status);
                    for (name, value) in headers {
                        builder = builder.header(name, value);
                    }
                    Ok(builder.body(body(b"{}")).unwrap())
                }
                Err(Fail::Transport) => Err(HttpError::Transport("connection reset".into())),
                Err(Fail::Signing) => Err(HttpError::Signing("credentials expired".into())),
            })
        }
    }

    fn body(data: &'static [u8]) -> ResponseBody {
        Full::new(Bytes::from_static(data))
            .map_err(|never| -> Box<dyn std::error::Error + Send + Sync> { match never {} })
            .boxed()
    }

    fn fast_config() -> RetryConfig {
        RetryConfig {
            backoff: ExponentialBackoff::fast(),
            ..RetryConfig::default()
        }
    }

    fn request(method: Method) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri("https://connect.us-east-1.amazonaws.com/contact/attributes")
            .body(Full::new(Bytes::from_static(b"{}")))
            .unwrap()
    }

    async fn run(
        config: RetryConfig,
        script: Vec<Scripted>,
        req: Request<Full<Bytes>>,
    ) -> (Result<Response<ResponseBody>, HttpError>, ScriptService) {
        let inner = ScriptService::new(script);
        let mut svc = RetryLayer::new(config).layer(inner.clone());
        let result = svc.ready().await.unwrap().call(req).await;
        (result, inner)
    }

    #[tokio::test]
    async fn test_success_is_not_retried() {
        let (result, inner) = run(fast_config(), vec![], request(Method::GET)).await;
        assert_eq!(result.unwrap().status(), StatusCode::OK);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_retried_on_503() {
        let script = vec![Ok((StatusCode::SERVICE_UNAVAILABLE, vec![]))];
        let (result, inner) = run(fast_config(), script, request(Method::GET)).await;
        assert_eq!(result.unwrap().status(), StatusCode::OK);
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_post_not_retried_on_5xx() {
        let script = vec![Ok((StatusCode::INTERNAL_SERVER_ERROR, vec![]))];
        let (result, inner) = run(fast_config(), script, request(Method::POST)).await;
        assert_eq!(result.unwrap().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_post_retried_on_throttling() {
        let script = vec![Ok((StatusCode::TOO_MANY_REQUESTS, vec![]))];
        let (result, inner) = run(fast_config(), script, request(Method::POST)).await;
        assert_eq!(result.unwrap().status(), StatusCode::OK);
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_retried_for_put_only() {
        let (result, inner) = run(fast_config(), vec![Err(Fail::Transport)], request(Method::PUT)).await;
        assert!(result.is_ok());
        assert_eq!(inner.calls(), 2);

        let (result, inner) = run(fast_config(), vec![Err(Fail::Transport)], request(Method::POST)).await;
        assert!(matches!(result, Err(HttpError::Transport(_))));
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_marked_put_not_retried_on_5xx() {
        let mut req = request(Method::PUT);
        req.extensions_mut().insert(NonIdempotent);
        let script = vec![Ok((StatusCode::SERVICE_UNAVAILABLE, vec![]))];
        let (result, inner) = run(fast_config(), script, req).await;
        assert_eq!(result.unwrap().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(inner.calls(), 1);

        let mut req = request(Method::PUT);
        req.extensions_mut().insert(NonIdempotent);
        let script = vec![Ok((StatusCode::TOO_MANY_REQUESTS, vec![]))];
        let (result, inner) = run(fast_config(), script, req).await;
        assert_eq!(result.unwrap().status(), StatusCode::OK);
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_signing_error_not_retried() {
        let (result, inner) = run(fast_config(), vec![Err(Fail::Signing)], request(Method::GET)).await;
        assert!(matches!(result, Err(HttpError::Signing(_))));
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_status() {
        let config = RetryConfig {
            max_retries: 2,
            ..fast_config()
        };
        let script = vec![Ok((StatusCode::BAD_GATEWAY, vec![])); 5];
        let (result, inner) = run(config, script, request(Method::GET)).await;
        assert_eq!(result.unwrap().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_attempt_header_and_extensions_on_retries() {
        #[derive(Clone, Debug, PartialEq)]
        struct Marker(&'static str);

        let mut req = request(Method::GET);
        req.extensions_mut().insert(Marker("creds"));
        let script = vec![
            Ok((StatusCode::SERVICE_UNAVAILABLE, vec![])),
            Ok((StatusCode::SERVICE_UNAVAILABLE, vec![])),
        ];
        let (result, inner) = run(fast_config(), script, req).await;
        assert!(result.is_ok());

        let seen = inner.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].headers().get(RETRY_ATTEMPT_HEADER).is_none());
        assert_eq!(seen[1].headers()[RETRY_ATTEMPT_HEADER], "1");
        assert_eq!(seen[2].headers()[RETRY_ATTEMPT_HEADER], "2");
        for attempt in seen.iter() {
            assert_eq!(attempt.extensions().get::<Marker>(), Some(&Marker("creds")));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_header_is_honored() {
        let config = RetryConfig {
            backoff: ExponentialBackoff::new(Duration::from_secs(30), Duration::from_secs(60)),
            ..RetryConfig::default()
        };
        let script = vec![Ok((StatusCode::TOO_MANY_REQUESTS, vec![("retry-after", "2")]))];
        let started = Instant::now();
        let (result, _) = run(config, script, request(Method::POST)).await;
        assert!(result.is_ok());

        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_timeout_cuts_backoff() {
        let config = RetryConfig {
            backoff: ExponentialBackoff {
                jitter: false,
                ..ExponentialBackoff::new(Duration::from_secs(10), Duration::from_secs(10))
            },
            ..RetryConfig::default()
        };
        let inner = ScriptService::new(vec![Ok((StatusCode::SERVICE_UNAVAILABLE, vec![])); 5]);
        let mut svc = RetryLayer::with_total_timeout(config, Some(Duration::from_secs(3)))
            .layer(inner.clone());

        let result = svc
            .ready()
            .await
            .unwrap()
            .call(request(Method::GET))
            .await;
        assert!(matches!(result, Err(HttpError::DeadlineExceeded(d)) if d == Duration::from_secs(3)));
        assert_eq!(inner.calls(), 1);
    }

    #[test]
    fn test_calculate_backoff_grows_and_caps() {
        let backoff = ExponentialBackoff {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            multiplier: 2.0,
            jitter: false,
        };
        assert_eq!(calculate_backoff(&backoff, 0), Duration::from_millis(100));
        assert_eq!(calculate_backoff(&backoff, 2), Duration::from_millis(400));
        assert_eq!(calculate_backoff(&backoff, 10), Duration::from_secs(1));
        assert_eq!(calculate_backoff(&backoff, usize::MAX), Duration::from_secs(1));
    }

    #[test]
    fn test_calculate_backoff_jitter_bounds() {
        let backoff = ExponentialBackoff {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            multiplier: 1.0,
            jitter: true,
        };
        for _ in 0..50 {
            let d = calculate_backoff(&backoff, 3);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(125));
        }
    }

    #[test]
    fn test_calculate_backoff_bad_multiplier() {
        for multiplier in [f64::NAN, f64::INFINITY, -2.0] {
            let backoff = ExponentialBackoff {
                initial: Duration::from_millis(50),
                max: Duration::from_secs(2),
                multiplier,
                jitter: false,
            };
            let d = calculate_backoff(&backoff, 4);
            assert!(d <= Duration::from_secs(2));
        }
    }
}
