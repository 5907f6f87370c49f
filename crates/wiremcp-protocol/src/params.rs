//! Extensible params: reserved `_meta` plus caller-defined fields.
//!
//! On the wire a params object is a single flat JSON object. The key `_meta`
//! is reserved for protocol metadata; every other key belongs to the caller
//! and must survive a round trip untouched, even when this crate does not
//! know what it means.
//!
//! ```
//! use wiremcp_protocol::ExtensibleParams;
//! use serde_json::json;
//!
//! let params = ExtensibleParams::from_value(json!({
//!     "_meta": {"progressToken": "abc"},
//!     "uri": "file:///notes.txt"
//! }))
//! .unwrap();
//!
//! assert_eq!(params.meta["progressToken"], "abc");
//! assert_eq!(params.additional_fields["uri"], "file:///notes.txt");
//! assert_eq!(
//!     params.to_value(),
//!     json!({"_meta": {"progressToken": "abc"}, "uri": "file:///notes.txt"})
//! );
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};
use wiremcp_core::logging::{targets, warn};

use crate::error::{WireError, json_type_name};
use crate::types::ProgressToken;

/// Reserved top-level key holding protocol metadata.
pub const META_KEY: &str = "_meta";

/// Key of the progress token inside `_meta`.
pub const PROGRESS_TOKEN_KEY: &str = "progressToken";

/// Protocol metadata carried under `_meta`.
pub type Meta = Map<String, Value>;

/// A params (or result) object split into reserved metadata and caller fields.
///
/// Encoding merges both back into one flat object; decoding splits on
/// [`META_KEY`]. A non-object `_meta` on input is dropped with a warning
/// rather than failing the whole message.
///
/// `additional_fields` is not expected to hold a `_meta` entry. If it does,
/// that entry is written out only while `meta` is empty; this keeps malformed
/// input from being lost but is not a supported way to set metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensibleParams {
    /// Protocol metadata, written as the `_meta` object.
    pub meta: Meta,
    /// Every other top-level field.
    pub additional_fields: Map<String, Value>,
}

/// Params of a notification.
pub type NotificationParams = ExtensibleParams;

/// Params of a request.
pub type RequestParams = ExtensibleParams;

/// Body of a result.
pub type ResultFields = ExtensibleParams;

impl ExtensibleParams {
    /// Creates empty params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there is neither metadata nor any other field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty() && self.additional_fields.is_empty()
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Adds a caller-defined field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a caller-defined field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.additional_fields.insert(key.into(), value.into())
    }

    /// Returns a caller-defined field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.additional_fields.get(key)
    }

    /// Returns `_meta.progressToken` if it is a string or integer.
    #[must_use]
    pub fn progress_token(&self) -> Option<ProgressToken> {
        self.meta
            .get(PROGRESS_TOKEN_KEY)
            .and_then(|value| ProgressToken::deserialize(value).ok())
    }

    /// Sets `_meta.progressToken`.
    pub fn set_progress_token(&mut self, token: impl Into<ProgressToken>) {
        self.meta
            .insert(PROGRESS_TOKEN_KEY.to_owned(), Value::from(token.into()));
    }

    /// Encodes into one flat JSON object.
    ///
    /// Empty params encode as `{}`, never `null`.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.additional_fields.clone();
        if !self.meta.is_empty() {
            map.insert(META_KEY.to_owned(), Value::Object(self.meta.clone()));
        }
        map
    }

    /// Encodes into a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Encodes into a JSON string.
    pub fn to_json_string(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(&self.to_map())?)
    }

    /// Decodes from a JSON value. `null` yields empty params.
    pub fn from_value(value: Value) -> Result<Self, WireError> {
        let mut params = Self::default();
        params.merge_value(value)?;
        Ok(params)
    }

    /// Decodes from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, WireError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decodes `value` on top of the existing contents.
    ///
    /// `_meta` entries are merged into [`meta`](Self::meta), so repeated
    /// calls accumulate. Other keys overwrite same-named caller fields.
    pub fn merge_value(&mut self, value: Value) -> Result<(), WireError> {
        match value {
            Value::Null => Ok(()),
            Value::Object(map) => {
                self.merge_map(map);
                Ok(())
            }
            other => Err(WireError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    fn merge_map(&mut self, map: Map<String, Value>) {
        for (key, value) in map {
            if key != META_KEY {
                self.additional_fields.insert(key, value);
                continue;
            }
            match value {
                Value::Object(meta) => self.meta.extend(meta),
                other => warn!(
                    target: targets::CODEC,
                    "dropping {} {META_KEY}: expected an object",
                    json_type_name(&other)
                ),
            }
        }
    }
}

impl Serialize for ExtensibleParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExtensibleParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
