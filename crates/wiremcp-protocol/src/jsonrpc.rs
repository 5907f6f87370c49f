//! JSON-RPC 2.0 framing.
//!
//! Only the framing lives here. Params and result bodies travel as raw
//! [`Value`]s and are decoded by the envelopes in `messages`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wiremcp_core::{McpError, McpErrorCode, McpResult};

/// Value of the `jsonrpc` member on every frame.
pub const JSONRPC_VERSION: &str = "2.0";

/// Correlates a response with its request. Either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_owned())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A request frame. Without an `id` it is a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    /// A request frame expecting a response under `id`.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>, id: impl Into<RequestId>) -> Self {
        Self::framed(method.into(), params, Some(id.into()))
    }

    /// A notification frame.
    #[must_use]
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::framed(method.into(), params, None)
    }

    fn framed(method: String, params: Option<Value>, id: Option<RequestId>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method,
            params,
            id,
        }
    }

    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// The `error` member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self {
            code: err.code.into(),
            message: err.message,
            data: err.data,
        }
    }
}

impl From<JsonRpcError> for McpError {
    fn from(err: JsonRpcError) -> Self {
        let mut mcp = McpError::new(McpErrorCode::from(err.code), err.message);
        mcp.data = err.data;
        mcp
    }
}

/// A response frame carrying either `result` or `error`.
///
/// `id` is `null` only for errors raised before the request id was known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    /// A success frame answering `id`.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    /// An error frame. Pass `None` when the failing request had no readable id.
    #[must_use]
    pub fn error(id: Option<RequestId>, error: impl Into<JsonRpcError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(error.into()),
            id,
        }
    }

    /// Opens the frame, yielding the request id and the raw result body.
    ///
    /// An `error` member comes back as the matching [`McpError`]. A wrong
    /// version, a success without an id, or a frame with neither member is
    /// an invalid request.
    pub fn into_result(self) -> McpResult<(RequestId, Value)> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(McpError::invalid_request(format!(
                "unsupported jsonrpc version {:?}",
                self.jsonrpc
            )));
        }
        match (self.error, self.result, self.id) {
            (Some(error), _, _) => Err(error.into()),
            (None, Some(result), Some(id)) => Ok((id, result)),
            (None, Some(_), None) => Err(McpError::invalid_request("success response has no id")),
            (None, None, _) => Err(McpError::invalid_request(
                "response carries neither result nor error",
            )),
        }
    }
}
