use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Extensions, Method, Request, Uri};
use http_body_util::Full;
use tower::Service;

use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;

/// One request in the making; see [`HttpClient::request`](crate::HttpClient::request).
///
/// An invalid header is remembered and reported by [`send`](Self::send).
///
/// ```ignore
/// let resp = client
///     .put("https://connect.us-east-1.amazonaws.com/queues/abc")
///     .header("content-type", "application/json")
///     .body_bytes(body)
///     .extension(credentials)
///     .send()
///     .await?;
/// ```
#[must_use = "nothing is sent until .send() is awaited"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    transport_security: TransportSecurity,
    method: Method,
    url: String,
    headers: Result<Vec<(HeaderName, HeaderValue)>, HttpError>,
    extensions: Extensions,
    body: Bytes,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        method: Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            transport_security,
            method,
            url,
            headers: Ok(Vec::new()),
            extensions: Extensions::new(),
            body: Bytes::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Ok(headers) = &mut self.headers {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => headers.push((name, value)),
                (Err(e), _) => self.headers = Err(e.into()),
                (_, Err(e)) => self.headers = Err(e.into()),
            }
        }
        self
    }

    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        headers
            .into_iter()
            .fold(self, |req, (name, value)| req.header(name.as_ref(), value.as_ref()))
    }

    /// Attach a value every layer can read, on every attempt.
    ///
    /// The signing layer takes the call's credentials from here.
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }

    pub fn body_bytes(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Send the request.
    ///
    /// Every status is `Ok`; 4xx and 5xx are for the caller to interpret.
    ///
    /// # Errors
    /// - a header or the URL is invalid, or the scheme is not allowed
    /// - network, TLS or timeout failure after any retries
    /// - [`HttpError::Overloaded`] when the client is saturated
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        let headers = self.headers?;
        let uri = check_url(&self.url, self.transport_security)?;

        let mut request = Request::builder().method(self.method).uri(uri);
        if let Some(map) = request.headers_mut() {
            for (name, value) in headers {
                map.append(name, value);
            }
        }
        let mut request = request.body(Full::new(self.body))?;
        *request.extensions_mut() = self.extensions;

        try_acquire_buffer_slot(&mut self.service).await?;
        let inner = self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}

/// Parse an absolute URL and check its scheme against `security`.
fn check_url(url: &str, security: TransportSecurity) -> Result<Uri, HttpError> {
    let invalid = |kind, reason: String| HttpError::InvalidUri {
        url: url.to_owned(),
        kind,
        reason,
    };

    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;
    if uri.authority().is_none() {
        return Err(invalid(InvalidUriKind::MissingAuthority, "no host".to_owned()));
    }

    match (uri.scheme_str(), security) {
        (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
        (Some("http"), TransportSecurity::TlsOnly) => Err(HttpError::InvalidScheme {
            scheme: "http".to_owned(),
            reason: "client requires https".to_owned(),
        }),
        (Some(other), _) => Err(HttpError::InvalidScheme {
            scheme: other.to_owned(),
            reason: "not http or https".to_owned(),
        }),
        (None, _) => Err(invalid(InvalidUriKind::MissingScheme, "no scheme".to_owned())),
    }
}
