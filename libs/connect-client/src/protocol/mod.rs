//! REST-JSON wire protocol: request marshalling, response and error parsing.

mod errors;
mod marshal;
mod unmarshal;

pub use errors::{ERROR_MESSAGE_HEADER, ERROR_TYPE_HEADER, REQUEST_ID_HEADER, parse_service_error};
pub use marshal::{CONTENT_TYPE, WireRequest, marshal};
pub use unmarshal::unmarshal;
