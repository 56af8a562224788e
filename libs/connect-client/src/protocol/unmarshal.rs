use serde_json::Value;

use crate::error::ConnectError;
use crate::operation::Operation;

/// Parse a successful response body into the operation's output.
///
/// Operations without an output body ignore whatever was sent. An empty body
/// yields the default output; unknown fields are ignored.
///
/// # Errors
/// Returns [`ConnectError::Deserialize`] when the body is not valid JSON for
/// the output type.
pub fn unmarshal<O: Operation>(body: &[u8]) -> Result<O::Output, ConnectError> {
    let desc = O::descriptor();
    let parsed = if desc.has_output {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(O::Output::default());
        }
        serde_json::from_slice(body)
    } else {
        serde_json::from_value(Value::Null)
    };
    parsed.map_err(|source| ConnectError::Deserialize {
        operation: desc.name,
        source,
    })
}
