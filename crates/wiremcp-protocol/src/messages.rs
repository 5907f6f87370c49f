//! MCP message envelopes.
//!
//! Base request, notification and result shapes. Their params are opaque
//! [`ExtensibleParams`]; all `_meta` handling is delegated to it.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};
use wiremcp_core::logging::{targets, warn};
use wiremcp_core::{McpError, McpResult, log_envelope};

use crate::error::{WireError, json_type_name};
use crate::jsonrpc::{JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, RequestId};
use crate::params::{ExtensibleParams, NotificationParams, RequestParams, ResultFields};
use crate::types::{Cursor, ProgressToken};

/// A notification: `{"method": ..., "params": ...}`.
///
/// `params` is omitted on the wire when empty; a missing or `null` params
/// decodes to empty params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Method name.
    pub method: String,
    /// Notification params.
    #[serde(default, skip_serializing_if = "ExtensibleParams::is_empty")]
    pub params: NotificationParams,
}

impl Notification {
    /// Creates a notification with empty params.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: NotificationParams::default(),
        }
    }

    /// Sets the params.
    #[must_use]
    pub fn with_params(mut self, params: NotificationParams) -> Self {
        self.params = params;
        self
    }

    /// Wraps the notification in a JSON-RPC request without an ID.
    #[must_use]
    pub fn into_jsonrpc(self) -> JsonRpcRequest {
        log_envelope!("encoding notification {}", self.method);
        let params = (!self.params.is_empty()).then(|| self.params.to_value());
        JsonRpcRequest::notification(self.method, params)
    }

    /// Unwraps a JSON-RPC notification.
    ///
    /// Fails if the message carries an ID, has the wrong protocol version, or
    /// its params are not an object.
    pub fn from_jsonrpc(request: JsonRpcRequest) -> McpResult<Self> {
        check_version(&request)?;
        let JsonRpcRequest {
            method, params, id, ..
        } = request;
        if let Some(id) = id {
            return Err(McpError::invalid_request(format!(
                "notification {method} must not carry an id (got {id})"
            )));
        }
        log_envelope!("decoding notification {method}");
        let params = match params {
            Some(value) => NotificationParams::from_value(value)?,
            None => NotificationParams::default(),
        };
        Ok(Self { method, params })
    }
}

/// A request: `{"method": ..., "params": ...}`.
///
/// Unlike notifications, params are always written, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Method name.
    pub method: String,
    /// Request params.
    #[serde(default)]
    pub params: RequestParams,
}

impl Request {
    /// Creates a request with empty params.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: RequestParams::default(),
        }
    }

    /// Sets the params.
    #[must_use]
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    /// Sets `_meta.progressToken`.
    #[must_use]
    pub fn with_progress_token(mut self, token: impl Into<ProgressToken>) -> Self {
        self.params.set_progress_token(token);
        self
    }

    /// Returns `_meta.progressToken`, if any.
    #[must_use]
    pub fn progress_token(&self) -> Option<ProgressToken> {
        self.params.progress_token()
    }

    /// Wraps the request in a JSON-RPC request with the given ID.
    #[must_use]
    pub fn into_jsonrpc(self, id: impl Into<RequestId>) -> JsonRpcRequest {
        log_envelope!("encoding request {}", self.method);
        JsonRpcRequest::new(self.method, Some(self.params.to_value()), id)
    }

    /// Unwraps a JSON-RPC request, returning its ID alongside.
    pub fn from_jsonrpc(request: JsonRpcRequest) -> McpResult<(RequestId, Self)> {
        check_version(&request)?;
        let JsonRpcRequest {
            method, params, id, ..
        } = request;
        let Some(id) = id else {
            return Err(McpError::invalid_request(format!(
                "request {method} has no id"
            )));
        };
        let params = match params {
            Some(value) => RequestParams::from_value(value)?,
            None => RequestParams::default(),
        };
        Ok((id, Self { method, params }))
    }
}

fn check_version(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc == JSONRPC_VERSION {
        Ok(())
    } else {
        Err(McpError::invalid_request(format!(
            "unsupported jsonrpc version {:?}",
            request.jsonrpc
        )))
    }
}

/// Key of the continuation cursor in a paginated result.
pub const NEXT_CURSOR_KEY: &str = "nextCursor";

/// A result page with an optional continuation cursor.
///
/// The body is flattened into the top-level object beside `nextCursor`.
/// `next_cursor` owns that key: a `nextCursor` entry in
/// `result.additional_fields` is never written, and an empty cursor is
/// treated as the last page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginatedResult {
    /// Result body.
    pub result: ResultFields,
    /// Cursor for the next page.
    pub next_cursor: Option<Cursor>,
}

impl PaginatedResult {
    /// A page with the given body and no cursor.
    #[must_use]
    pub fn new(result: ResultFields) -> Self {
        Self {
            result,
            next_cursor: None,
        }
    }

    /// Sets the cursor for the next page.
    #[must_use]
    pub fn with_next_cursor(mut self, cursor: impl Into<Cursor>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Encodes the page as one flat object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = self.result.to_map();
        if map.remove(NEXT_CURSOR_KEY).is_some() {
            warn!(
                target: targets::CODEC,
                "dropping {NEXT_CURSOR_KEY} from result fields: owned by the page cursor"
            );
        }
        if let Some(cursor) = self.next_cursor.as_ref().filter(|c| !c.as_str().is_empty()) {
            map.insert(NEXT_CURSOR_KEY.to_owned(), Value::String(cursor.0.clone()));
        }
        Value::Object(map)
    }

    /// Decodes a page. `null` is an empty last page.
    ///
    /// A non-string `nextCursor` is dropped like a malformed `_meta`.
    pub fn from_value(value: Value) -> Result<Self, WireError> {
        let mut map = match value {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(WireError::NotAnObject {
                    found: json_type_name(&other),
                });
            }
        };
        let next_cursor = match map.remove(NEXT_CURSOR_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(cursor)) if cursor.is_empty() => None,
            Some(Value::String(cursor)) => Some(Cursor(cursor)),
            Some(other) => {
                warn!(
                    target: targets::CODEC,
                    "dropping {} {NEXT_CURSOR_KEY}: expected a string",
                    json_type_name(&other)
                );
                None
            }
        };
        Ok(Self {
            result: ResultFields::from_value(Value::Object(map))?,
            next_cursor,
        })
    }

    /// Wraps the page in a success response answering `id`.
    #[must_use]
    pub fn into_jsonrpc(self, id: impl Into<RequestId>) -> JsonRpcResponse {
        let id = id.into();
        log_envelope!("encoding result page for {id}");
        JsonRpcResponse::success(id, self.to_value())
    }

    /// Unwraps a response into its request ID and page.
    ///
    /// Error responses come back as the carried [`McpError`].
    pub fn from_jsonrpc(response: JsonRpcResponse) -> McpResult<(RequestId, Self)> {
        let (id, body) = response.into_result()?;
        log_envelope!("decoding result page for {id}");
        Ok((id, Self::from_value(body)?))
    }
}

impl Serialize for PaginatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PaginatedResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremcp_core::McpErrorCode;

    #[test]
    fn empty_notification_omits_params() {
        let notification = Notification::new("notifications/initialized");
        let value = serde_json::to_value(&notification).expect("serialize notification");
        assert_eq!(value, json!({"method": "notifications/initialized"}));
    }

    #[test]
    fn notification_flattens_params() {
        let notification = Notification::new("notifications/resources/updated").with_params(
            NotificationParams::new()
                .with_meta("origin", "watcher")
                .with_field("uri", "file:///a.txt"),
        );
        let value = serde_json::to_value(&notification).expect("serialize notification");
        assert_eq!(
            value,
            json!({
                "method": "notifications/resources/updated",
                "params": {"_meta": {"origin": "watcher"}, "uri": "file:///a.txt"}
            })
        );

        let back: Notification = serde_json::from_value(value).expect("deserialize notification");
        assert_eq!(back, notification);
    }

    #[test]
    fn notification_accepts_missing_or_null_params() {
        for value in [
            json!({"method": "m"}),
            json!({"method": "m", "params": null}),
            json!({"method": "m", "params": {}}),
        ] {
            let notification: Notification = serde_json::from_value(value).expect("deserialize");
            assert!(notification.params.is_empty());
        }
    }

    #[test]
    fn notification_with_malformed_meta_still_decodes() {
        let notification: Notification = serde_json::from_value(json!({
            "method": "m",
            "params": {"_meta": [1, 2], "x": 1}
        }))
        .expect("deserialize");
        assert!(notification.params.meta.is_empty());
        assert_eq!(notification.params.get("x"), Some(&json!(1)));
    }

    #[test]
    fn notification_rejects_non_object_params() {
        let result = serde_json::from_value::<Notification>(json!({"method": "m", "params": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn notification_jsonrpc_round_trip() {
        let request = Notification::new("notifications/progress")
            .with_params(NotificationParams::new().with_field("progress", 0.5))
            .into_jsonrpc();
        assert!(request.is_notification());
        assert_eq!(request.params, Some(json!({"progress": 0.5})));

        let back = Notification::from_jsonrpc(request).expect("unwrap notification");
        assert_eq!(back.method, "notifications/progress");
        assert_eq!(back.params.get("progress"), Some(&json!(0.5)));

        let bare = Notification::new("notifications/initialized").into_jsonrpc();
        assert_eq!(bare.params, None);
        let json = serde_json::to_value(&bare).expect("serialize");
        assert_eq!(
            json,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"})
        );
    }

    #[test]
    fn notification_with_id_is_rejected() {
        let request = JsonRpcRequest::new("notifications/progress", None, 1i64);
        let err = Notification::from_jsonrpc(request).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidRequest);
    }

    #[test]
    fn notification_with_bad_params_maps_to_invalid_params() {
        let request = JsonRpcRequest::notification("m", Some(json!("oops")));
        let err = Notification::from_jsonrpc(request).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut request = JsonRpcRequest::notification("m", None);
        request.jsonrpc = "1.0".to_string();
        let err = Notification::from_jsonrpc(request).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidRequest);
    }

    #[test]
    fn request_always_writes_params() {
        let value = serde_json::to_value(Request::new("ping")).expect("serialize");
        assert_eq!(value, json!({"method": "ping", "params": {}}));
    }

    #[test]
    fn request_progress_token_round_trip() {
        let request = Request::new("tools/call")
            .with_params(RequestParams::new().with_field("name", "echo"))
            .with_progress_token("p-1");
        assert_eq!(request.progress_token(), Some(ProgressToken::from("p-1")));

        let wire = request.clone().into_jsonrpc(7i64);
        assert_eq!(
            wire.params,
            Some(json!({"_meta": {"progressToken": "p-1"}, "name": "echo"}))
        );

        let (id, back) = Request::from_jsonrpc(wire).expect("unwrap request");
        assert_eq!(id, RequestId::Number(7));
        assert_eq!(back, request);
    }

    #[test]
    fn request_without_id_is_rejected() {
        let wire = JsonRpcRequest::notification("tools/call", None);
        let err = Request::from_jsonrpc(wire).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidRequest);
    }

    #[test]
    fn paginated_result_flattens_body() {
        let page = PaginatedResult {
            result: ResultFields::new()
                .with_meta("total", 10)
                .with_field("items", json!([1, 2])),
            next_cursor: Some(Cursor::from("page-2")),
        };
        let value = serde_json::to_value(&page).expect("serialize page");
        assert_eq!(
            value,
            json!({"_meta": {"total": 10}, "items": [1, 2], "nextCursor": "page-2"})
        );

        let back: PaginatedResult = serde_json::from_value(value).expect("deserialize page");
        assert_eq!(back, page);
    }

    #[test]
    fn page_cursor_wins_over_stale_result_field() {
        let page = PaginatedResult::new(ResultFields::new().with_field("nextCursor", "stale"))
            .with_next_cursor("fresh");
        let text = serde_json::to_string(&page).expect("serialize page");
        assert_eq!(text, r#"{"nextCursor":"fresh"}"#);

        let back: PaginatedResult = serde_json::from_str(&text).expect("deserialize page");
        assert_eq!(back.next_cursor, Some(Cursor::from("fresh")));
        assert!(back.result.is_empty());
    }

    #[test]
    fn stray_cursor_field_is_not_written() {
        let page = PaginatedResult::new(
            ResultFields::new()
                .with_field("nextCursor", "stale")
                .with_field("items", json!([])),
        );
        let value = page.to_value();
        assert_eq!(value, json!({"items": []}));

        let back = PaginatedResult::from_value(value).expect("decode page");
        assert_eq!(back.next_cursor, None);
        assert_eq!(back.result.get("nextCursor"), None);
        assert_eq!(back.to_value(), json!({"items": []}));
    }

    #[test]
    fn empty_cursor_is_omitted() {
        let page = PaginatedResult::new(ResultFields::new()).with_next_cursor("");
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({}));

        let back: PaginatedResult =
            serde_json::from_value(json!({"nextCursor": ""})).expect("deserialize page");
        assert_eq!(back.next_cursor, None);
    }

    #[test]
    fn malformed_cursor_is_dropped() {
        let back = PaginatedResult::from_value(json!({"nextCursor": 5, "x": 1})).expect("decode");
        assert_eq!(back.next_cursor, None);
        assert_eq!(back.result.get("x"), Some(&json!(1)));
        assert!(back.result.get("nextCursor").is_none());

        assert!(PaginatedResult::from_value(json!([1])).is_err());
    }

    #[test]
    fn page_jsonrpc_round_trip() {
        let page = PaginatedResult::new(
            ResultFields::new()
                .with_meta("total", 3)
                .with_field("tools", json!([{"name": "echo"}])),
        )
        .with_next_cursor("c-2");

        let response = page.clone().into_jsonrpc("list-1");
        assert_eq!(
            serde_json::to_value(&response).expect("serialize response"),
            json!({
                "jsonrpc": "2.0",
                "result": {"_meta": {"total": 3}, "tools": [{"name": "echo"}], "nextCursor": "c-2"},
                "id": "list-1"
            })
        );

        let (id, back) = PaginatedResult::from_jsonrpc(response).expect("unwrap page");
        assert_eq!(id, RequestId::from("list-1"));
        assert_eq!(back, page);
    }

    #[test]
    fn page_error_response_maps_to_mcp_error() {
        let response = JsonRpcResponse::error(
            Some(RequestId::Number(4)),
            McpError::method_not_found("tools/list"),
        );
        let err = PaginatedResult::from_jsonrpc(response).unwrap_err();
        assert_eq!(err.code, McpErrorCode::MethodNotFound);

        let bad_body = JsonRpcResponse::success(RequestId::Number(5), json!("oops"));
        let err = PaginatedResult::from_jsonrpc(bad_body).unwrap_err();
        assert_eq!(err.code, McpErrorCode::InvalidParams);
    }

    #[test]
    fn last_page_has_no_cursor() {
        let back: PaginatedResult =
            serde_json::from_value(json!({"items": []})).expect("deserialize page");
        assert_eq!(back.next_cursor, None);
        assert_eq!(back.result.get("items"), Some(&json!([])));
        assert_eq!(serde_json::to_value(&back).unwrap(), json!({"items": []}));
    }
}
