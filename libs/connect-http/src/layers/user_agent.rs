use crate::error::HttpError;
use http::{HeaderValue, Request, Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that identifies the client in the `User-Agent` header.
///
/// A request without the header gets the configured value. A request that
/// already carries one (an application identifier) gets the configured
/// value appended after a space, so the service sees both.
#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    user_agent: HeaderValue,
}

impl UserAgentLayer {
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if the string is not a valid header value
    pub fn try_new(user_agent: impl AsRef<str>) -> Result<Self, HttpError> {
        let user_agent =
            HeaderValue::from_str(user_agent.as_ref()).map_err(HttpError::InvalidHeaderValue)?;
        Ok(Self { user_agent })
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    user_agent: HeaderValue,
}

impl<S> UserAgentService<S> {
    fn merged(&self, existing: &HeaderValue) -> HeaderValue {
        if existing.as_bytes().ends_with(self.user_agent.as_bytes()) {
            return existing.clone();
        }
        let mut combined = Vec::with_capacity(existing.len() + 1 + self.user_agent.len());
        combined.extend_from_slice(existing.as_bytes());
        combined.push(b' ');
        combined.extend_from_slice(self.user_agent.as_bytes());
        // Both halves are valid header bytes, so the join is too.
        HeaderValue::from_bytes(&combined).unwrap_or_else(|_| existing.clone())
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let value = match req.headers().get(http::header::USER_AGENT) {
            Some(existing) => self.merged(existing),
            None => self.user_agent.clone(),
        };
        req.headers_mut().insert(http::header::USER_AGENT, value);
        self.inner.call(req)
    }
}
