//! AWS Signature Version 4 request signing.
//!
//! Signs the `content-type`, `host`, `x-amz-date` and (when a session token
//! is present) `x-amz-security-token` headers plus a SHA-256 hash of the
//! exact body bytes.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::HeaderValue;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST, HeaderName};
use http::request::Parts;
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::SigningError;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Where and when a request is signed.
#[derive(Clone, Debug)]
pub struct SigningParams<'a> {
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
}

/// Intermediate values of one signature, exposed for diagnostics and tests.
#[derive(Debug)]
pub struct SigningOutput {
    pub canonical_request: String,
    pub string_to_sign: String,
    pub signed_headers: String,
    pub signature: String,
}

/// Sign `parts` in place: sets `host`, `x-amz-date`, the optional
/// `x-amz-security-token` and `authorization` headers.
///
/// # Errors
/// Fails when the request has no host or a signed header is not visible ASCII.
pub fn sign_request(
    parts: &mut Parts,
    body: &[u8],
    credentials: &Credentials,
    params: &SigningParams<'_>,
) -> Result<SigningOutput, SigningError> {
    let amz_date = params.time.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.time.format("%Y%m%d").to_string();

    if !parts.headers.contains_key(HOST) {
        let authority = parts.uri.authority().ok_or(SigningError::MissingHost)?;
        parts
            .headers
            .insert(HOST, header_value("host", authority.as_str())?);
    }
    parts
        .headers
        .insert(X_AMZ_DATE, header_value(X_AMZ_DATE, &amz_date)?);
    match credentials.session_token() {
        Some(token) => {
            let mut value = header_value(X_AMZ_SECURITY_TOKEN, token.expose())?;
            value.set_sensitive(true);
            parts.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
        None => {
            parts.headers.remove(X_AMZ_SECURITY_TOKEN);
        }
    }

    let (canonical_headers, signed_headers) = canonical_headers(parts)?;
    let canonical_request = format!(
        "{method}\n{uri}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload}",
        method = parts.method.as_str(),
        uri = canonical_uri(parts.uri.path()),
        query = canonical_query(parts.uri.query().unwrap_or("")),
        payload = hex::encode(Sha256::digest(body)),
    );

    let scope = format!(
        "{date}/{region}/{service}/aws4_request",
        region = params.region,
        service = params.service
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let key = signing_key(
        credentials.secret_access_key().expose(),
        &date,
        params.region,
        params.service,
    );
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={access_key}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        access_key = credentials.access_key_id(),
    );
    let mut value = header_value("authorization", &authorization)?;
    value.set_sensitive(true);
    parts.headers.insert(AUTHORIZATION, value);

    Ok(SigningOutput {
        canonical_request,
        string_to_sign,
        signed_headers,
        signature,
    })
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, SigningError> {
    HeaderValue::from_str(value).map_err(|source| SigningError::InvalidHeaderValue { name, source })
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts any key length"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the per-day, per-region, per-service signing key.
#[must_use]
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_secret = zeroize::Zeroizing::new(format!("AWS4{secret}"));
    let k_date = hmac(k_secret.as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

fn is_signed(name: &HeaderName) -> bool {
    *name == CONTENT_TYPE
        || *name == HOST
        || name.as_str() == X_AMZ_DATE
        || name.as_str() == X_AMZ_SECURITY_TOKEN
}

fn canonical_headers(parts: &Parts) -> Result<(String, String), SigningError> {
    let mut names: Vec<&HeaderName> = parts.headers.keys().filter(|n| is_signed(n)).collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    let mut canonical = String::new();
    for name in &names {
        let values = parts
            .headers
            .get_all(*name)
            .iter()
            .map(|v| {
                v.to_str()
                    .map(collapse_whitespace)
                    .map_err(|_| SigningError::UnsignableHeader(name.as_str().to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        canonical.push_str(name.as_str());
        canonical.push(':');
        canonical.push_str(&values.join(","));
        canonical.push('\n');
    }

    let signed = names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(";");
    Ok((canonical, signed))
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Each segment of the already-encoded path is encoded once more.
fn canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode each pair, re-encode strictly, then sort by key and value.
fn canonical_query(query: &str) -> String {
    let mut pairs: Vec<(String, String)> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (strict_encode(key), strict_encode(value))
        })
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn strict_encode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => urlencoding::encode(&decoded).into_owned(),
        Err(_) => urlencoding::encode(raw).into_owned(),
    }
}
