use std::time::{Duration, SystemTime};

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;

use crate::error::HttpError;

/// Response body after decompression, type-erased.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// How long the service asked us to wait, from `Retry-After`.
///
/// Accepts delta-seconds and HTTP-dates (RFC 9110 10.2.3). Negative values,
/// dates in the past and garbage yield `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();
    match value.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => httpdate::parse_http_date(value)
            .ok()?
            .duration_since(SystemTime::now())
            .ok(),
    }
}

/// A response of any status, body not yet read.
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.inner.status())
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the body, capped at the client's `max_body_size`.
    ///
    /// # Errors
    /// [`HttpError::BodyTooLarge`] past the cap, [`HttpError::Transport`] if
    /// the connection fails mid-body.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect_limited(self.inner.into_body(), self.max_body_size).await
    }

    /// Status, headers and the body read as by [`bytes`](Self::bytes).
    ///
    /// # Errors
    /// Same as [`bytes`](Self::bytes).
    pub async fn into_parts(self) -> Result<(StatusCode, HeaderMap, Bytes), HttpError> {
        let (parts, body) = self.inner.into_parts();
        let body = collect_limited(body, self.max_body_size).await?;
        Ok((parts.status, parts.headers, body))
    }
}

/// The cap counts decompressed bytes.
async fn collect_limited(body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(body);
    let mut buf = BytesMut::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        let Some(chunk) = frame.data_ref() else {
            continue;
        };
        let actual = buf.len() + chunk.len();
        if actual > limit {
            return Err(HttpError::BodyTooLarge { limit, actual });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(buf.freeze())
}
