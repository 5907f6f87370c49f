//! Wire decode errors.

use serde_json::Value;
use wiremcp_core::McpError;

/// Errors raised while decoding MCP wire values.
///
/// A non-object `_meta` is deliberately absent here: the params codec drops
/// it and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The input was not valid JSON, or did not fit the target shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Valid JSON, but not an object where one is required.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type of the offending value.
        found: &'static str,
    },
    /// A content object without a `type` field.
    #[error("content object has no `type` discriminator")]
    MissingContentType,
    /// A content `type` outside the known set.
    #[error("unknown content type: {0}")]
    UnknownContentType(String),
    /// Image or audio data that is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl From<WireError> for McpError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Json(json) => McpError::from(json),
            other => McpError::invalid_params(other.to_string()),
        }
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
