use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};

use crate::error::{FaultKind, ServiceError};

pub const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
pub const ERROR_MESSAGE_HEADER: &str = "x-amzn-errormessage";
pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

const DISCRIMINATOR_FIELDS: [&str; 3] = ["__type", "code", "Code"];
const MESSAGE_FIELDS: [&str; 3] = ["message", "Message", "errorMessage"];

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// `x-amzn-ErrorType` may carry a suffix after `:`, e.g.
/// `ThrottlingException:http://internal.amazon.com/...`.
fn code_from_header(headers: &HeaderMap) -> Option<String> {
    let raw = header_str(headers, ERROR_TYPE_HEADER)?;
    let code = raw.split(':').next().unwrap_or(raw).trim();
    (!code.is_empty()).then(|| code.to_owned())
}

/// `__type` may be namespaced, e.g. `com.amazonaws.connect#ThrottlingException`.
fn code_from_body(payload: &Map<String, Value>) -> Option<String> {
    DISCRIMINATOR_FIELDS.iter().find_map(|field| {
        let raw = payload.get(*field)?.as_str()?;
        let code = raw.rsplit('#').next().unwrap_or(raw);
        let code = code.split(':').next().unwrap_or(code).trim();
        (!code.is_empty()).then(|| code.to_owned())
    })
}

/// Build a [`ServiceError`] from a non-2xx response.
///
/// Never fails: a body that is not a JSON object is treated as empty and the
/// headers alone decide the fault kind.
#[must_use]
pub fn parse_service_error(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> ServiceError {
    let mut payload = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let code = code_from_header(headers)
        .or_else(|| code_from_body(&payload))
        .unwrap_or_default();

    let message = MESSAGE_FIELDS
        .iter()
        .find_map(|field| payload.get(*field)?.as_str().map(str::to_owned))
        .or_else(|| header_str(headers, ERROR_MESSAGE_HEADER).map(str::to_owned));

    for field in DISCRIMINATOR_FIELDS.iter().chain(MESSAGE_FIELDS.iter()) {
        payload.remove(*field);
    }

    ServiceError {
        kind: FaultKind::from_code(&code),
        code,
        message,
        status,
        request_id: header_str(headers, REQUEST_ID_HEADER).map(str::to_owned),
        fields: payload,
    }
}
