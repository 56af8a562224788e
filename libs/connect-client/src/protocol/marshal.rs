use bytes::Bytes;
use http::Method;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ConnectError;
use crate::operation::{Operation, OperationDescriptor};

/// Content type of every request with a body.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// A marshalled request, ready to be joined with the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    /// Percent-encoded path with the query string, if any.
    pub path_and_query: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Bytes>,
}

/// Convert an operation input into its HTTP form.
///
/// An absent idempotency token is generated here, once per call; retries
/// resend the same body.
///
/// # Errors
/// - [`ConnectError::MissingRequiredField`] for an absent or null required member
/// - [`ConnectError::InvalidLabel`] for an empty or structured path label
/// - [`ConnectError::Serialize`] if the input does not serialize to an object
pub fn marshal<O: Operation>(input: &O) -> Result<WireRequest, ConnectError> {
    let desc = O::descriptor();
    let value = serde_json::to_value(input).map_err(|source| ConnectError::Serialize {
        operation: desc.name,
        source,
    })?;
    marshal_value(desc, value)
}

pub fn marshal_value(
    desc: &OperationDescriptor,
    value: Value,
) -> Result<WireRequest, ConnectError> {
    let mut members = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ConnectError::Serialize {
                operation: desc.name,
                source: <serde_json::Error as serde::ser::Error>::custom(format!(
                    "input must serialize to an object, got {other}"
                )),
            });
        }
    };

    if let Some(member) = desc.idempotency_token
        && members.get(member).is_none_or(Value::is_null)
    {
        members.insert(member.to_owned(), Value::String(Uuid::new_v4().to_string()));
    }

    if let Some(field) = desc
        .required
        .iter()
        .copied()
        .find(|field| members.get(*field).is_none_or(Value::is_null))
    {
        return Err(ConnectError::MissingRequiredField {
            operation: desc.name,
            field,
        });
    }

    let mut path_and_query = expand_uri(desc, &mut members)?;
    append_query(desc, &mut members, &mut path_and_query);

    let mut headers = Vec::new();
    for (member, header) in desc.headers {
        if let Some(text) = members.remove(*member).as_ref().and_then(scalar_text) {
            headers.push((*header, text));
        }
    }

    members.retain(|_, v| !v.is_null());
    let body = if members.is_empty() {
        if matches!(desc.method, Method::GET | Method::DELETE | Method::HEAD) {
            None
        } else {
            Some(Bytes::from_static(b"{}"))
        }
    } else {
        Some(Bytes::from(Value::Object(members).to_string()))
    };
    if body.is_some() {
        headers.push(("content-type", CONTENT_TYPE.to_owned()));
    }

    Ok(WireRequest {
        method: desc.method.clone(),
        path_and_query,
        headers,
        body,
    })
}

/// Text of a scalar member; `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn expand_uri(
    desc: &OperationDescriptor,
    members: &mut Map<String, Value>,
) -> Result<String, ConnectError> {
    let mut out = String::with_capacity(desc.uri.len() + 32);
    let mut rest = desc.uri;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let Some((raw, tail)) = rest[open + 1..].split_once('}') else {
            return Err(ConnectError::InvalidLabel {
                operation: desc.name,
                label: rest[open..].to_owned(),
            });
        };
        let (label, greedy) = match raw.strip_suffix('+') {
            Some(label) => (label, true),
            None => (raw, false),
        };

        let text = members
            .remove(label)
            .as_ref()
            .and_then(scalar_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ConnectError::InvalidLabel {
                operation: desc.name,
                label: label.to_owned(),
            })?;

        if greedy {
            let encoded: Vec<_> = text.split('/').map(urlencoding::encode).collect();
            out.push_str(&encoded.join("/"));
        } else {
            out.push_str(&urlencoding::encode(&text));
        }
        rest = tail;
    }
    out.push_str(rest);
    Ok(out)
}

fn append_query(desc: &OperationDescriptor, members: &mut Map<String, Value>, out: &mut String) {
    let mut separator = if out.contains('?') { '&' } else { '?' };
    let mut push = |key: &str, value: &str| {
        out.push(separator);
        out.push_str(&urlencoding::encode(key));
        out.push('=');
        out.push_str(&urlencoding::encode(value));
        separator = '&';
    };

    for (member, key) in desc.query {
        match members.remove(*member) {
            Some(Value::Array(items)) => {
                for text in items.iter().filter_map(scalar_text) {
                    push(key, &text);
                }
            }
            Some(value) => {
                if let Some(text) = scalar_text(&value) {
                    push(key, &text);
                }
            }
            None => {}
        }
    }
}
