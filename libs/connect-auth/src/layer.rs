use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use tower::{Layer, Service};

use connect_http::HttpError;

use crate::credentials::Credentials;
use crate::signer::{SigningParams, sign_request};

/// Tower layer that signs outbound requests with AWS Signature Version 4.
///
/// Credentials are taken from the request's extensions, so one client can
/// serve callers with different identities. A request without
/// [`Credentials`] in its extensions is forwarded unsigned.
///
/// Installed through the transport's auth hook, the layer sits inside the
/// retry loop and every attempt gets a fresh `x-amz-date` and signature.
#[derive(Clone, Debug)]
pub struct SigV4Layer {
    region: Arc<str>,
    service: Arc<str>,
}

impl SigV4Layer {
    #[must_use]
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: Arc::from(region.into()),
            service: Arc::from(service.into()),
        }
    }
}

impl<S> Layer<S> for SigV4Layer {
    type Service = SigV4Service<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SigV4Service {
            inner,
            region: Arc::clone(&self.region),
            service: Arc::clone(&self.service),
        }
    }
}

/// Created by [`SigV4Layer`].
#[derive(Clone, Debug)]
pub struct SigV4Service<S> {
    inner: S,
    region: Arc<str>,
    service: Arc<str>,
}

impl<S, ResBody> Service<Request<Full<Bytes>>> for SigV4Service<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<ResBody>, HttpError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        // Clone-swap pattern (Tower Service contract).
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let Some(credentials) = req.extensions().get::<Credentials>().cloned() else {
            return Box::pin(async move { inner.call(req).await });
        };
        let region = Arc::clone(&self.region);
        let service = Arc::clone(&self.service);

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };

            let params = SigningParams {
                region: &region,
                service: &service,
                time: chrono::Utc::now(),
            };
            sign_request(&mut parts, &body, &credentials, &params)
                .map_err(|e| HttpError::Signing(Box::new(e)))?;
            tracing::trace!(
                access_key_id = credentials.access_key_id(),
                region = %region,
                service = %service,
                "request signed"
            );

            inner.call(Request::from_parts(parts, Full::new(body))).await
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records the headers and body of every request it receives.
    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<(http::HeaderMap, Bytes)>>>,
    }

    impl Service<Request<Full<Bytes>>> for Recorder {
        type Response = Response<Full<Bytes>>;
        type Error = HttpError;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, HttpError>> + Send>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let seen = Arc::clone(&self.seen);
            Box::pin(async move {
                let (parts, body) = req.into_parts();
                let bytes = body.collect().await.unwrap().to_bytes();
                seen.lock().unwrap().push((parts.headers, bytes));
                Ok(Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap())
            })
        }
    }

    fn request(with_credentials: Option<Credentials>) -> Request<Full<Bytes>> {
        let mut req = Request::builder()
            .method(Method::PUT)
            .uri("https://connect.eu-west-2.amazonaws.com/queues/i-1")
            .header("content-type", "application/x-amz-json-1.1")
            .body(Full::new(Bytes::from_static(br#"{"Name":"Support"}"#)))
            .unwrap();
        if let Some(creds) = with_credentials {
            req.extensions_mut().insert(creds);
        }
        req
    }

    #[tokio::test]
    async fn signs_when_credentials_present() {
        let recorder = Recorder::default();
        let mut svc = SigV4Layer::new("eu-west-2", "connect").layer(recorder.clone());

        let creds = Credentials::from_keys("AKIDEXAMPLE", "secret");
        svc.ready()
            .await
            .unwrap()
            .call(request(Some(creds)))
            .await
            .unwrap();

        let seen = recorder.seen.lock().unwrap();
        let (headers, body) = &seen[0];
        let auth = headers["authorization"].to_str().unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(auth.contains("/eu-west-2/connect/aws4_request"));
        assert!(auth.contains("SignedHeaders=content-type;host;x-amz-date,"));
        assert!(headers.contains_key("x-amz-date"));
        assert_eq!(headers["host"], "connect.eu-west-2.amazonaws.com");
        assert_eq!(&body[..], br#"{"Name":"Support"}"#);
    }

    #[tokio::test]
    async fn forwards_unsigned_without_credentials() {
        let recorder = Recorder::default();
        let mut svc = SigV4Layer::new("us-east-1", "connect").layer(recorder.clone());

        svc.ready().await.unwrap().call(request(None)).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert!(!seen[0].0.contains_key("authorization"));
        assert!(!seen[0].0.contains_key("x-amz-date"));
    }
}
