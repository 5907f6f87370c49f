//! Message content variants.
//!
//! [`Content`] is a closed set of four payload kinds. Each variant writes its
//! own `type` discriminator, stamped by its constructor; the field is private
//! so a variant can never carry the wrong one. Decoding dispatches on `type`
//! first and rejects anything outside the set.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use wiremcp_core::logging::{debug, targets};

use crate::error::{WireError, json_type_name};
use crate::types::{Annotations, ResourceContents};

/// Discriminator values of the content variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `"text"`
    Text,
    /// `"image"`
    Image,
    /// `"audio"`
    Audio,
    /// `"embedded_resource"`
    EmbeddedResource,
}

impl ContentType {
    /// All content types.
    pub const ALL: [ContentType; 4] = [
        ContentType::Text,
        ContentType::Image,
        ContentType::Audio,
        ContentType::EmbeddedResource,
    ];

    /// Returns the wire discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Audio => "audio",
            ContentType::EmbeddedResource => "embedded_resource",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WireError::UnknownContentType(s.to_owned()))
    }
}

impl PartialEq<&str> for ContentType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Zero-sized `type` field that only (de)serializes one fixed value.
macro_rules! content_tag {
    ($name:ident, $kind:expr) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        struct $name;

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($kind.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let found = String::deserialize(deserializer)?;
                if found == $kind.as_str() {
                    Ok($name)
                } else {
                    Err(de::Error::invalid_value(
                        de::Unexpected::Str(&found),
                        &$kind.as_str(),
                    ))
                }
            }
        }
    };
}

content_tag!(TextTag, ContentType::Text);
content_tag!(ImageTag, ContentType::Image);
content_tag!(AudioTag, ContentType::Audio);
content_tag!(EmbeddedResourceTag, ContentType::EmbeddedResource);

/// Text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    kind: TextTag,
    /// The text.
    pub text: String,
    /// Optional annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl TextContent {
    /// Creates text content.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: TextTag,
            text: text.into(),
            annotations: None,
        }
    }

    /// Returns [`ContentType::Text`].
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::Text
    }
}

/// Image content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(rename = "type")]
    kind: ImageTag,
    /// Base64-encoded image data.
    pub data: String,
    /// MIME type (e.g., "image/png").
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Optional annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl ImageContent {
    /// Creates image content from already base64-encoded data.
    #[must_use]
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            kind: ImageTag,
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
        }
    }

    /// Creates image content from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes), mime_type)
    }

    /// Decodes the base64 payload.
    pub fn decode_data(&self) -> Result<Vec<u8>, WireError> {
        Ok(BASE64_STANDARD.decode(&self.data)?)
    }

    /// Returns [`ContentType::Image`].
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::Image
    }
}

/// Audio content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioContent {
    #[serde(rename = "type")]
    kind: AudioTag,
    /// Base64-encoded audio data.
    pub data: String,
    /// MIME type (e.g., "audio/wav").
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Optional annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl AudioContent {
    /// Creates audio content from already base64-encoded data.
    #[must_use]
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            kind: AudioTag,
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
        }
    }

    /// Creates audio content from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64_STANDARD.encode(bytes), mime_type)
    }

    /// Decodes the base64 payload.
    pub fn decode_data(&self) -> Result<Vec<u8>, WireError> {
        Ok(BASE64_STANDARD.decode(&self.data)?)
    }

    /// Returns [`ContentType::Audio`].
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::Audio
    }
}

/// A resource embedded in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedResource {
    #[serde(rename = "type")]
    kind: EmbeddedResourceTag,
    /// The resource contents.
    pub resource: ResourceContents,
    /// Optional annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl EmbeddedResource {
    /// Creates an embedded resource.
    #[must_use]
    pub fn new(resource: ResourceContents) -> Self {
        Self {
            kind: EmbeddedResourceTag,
            resource,
            annotations: None,
        }
    }

    /// Returns [`ContentType::EmbeddedResource`].
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::EmbeddedResource
    }
}

/// Content in MCP messages.
///
/// Serializes as the inner variant, which carries its own `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Text content.
    Text(TextContent),
    /// Image content.
    Image(ImageContent),
    /// Audio content.
    Audio(AudioContent),
    /// Embedded resource.
    EmbeddedResource(EmbeddedResource),
}

impl Content {
    /// Text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(TextContent::new(text))
    }

    /// Image content from base64 data.
    #[must_use]
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Content::Image(ImageContent::new(data, mime_type))
    }

    /// Audio content from base64 data.
    #[must_use]
    pub fn audio(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Content::Audio(AudioContent::new(data, mime_type))
    }

    /// Embedded resource content.
    #[must_use]
    pub fn embedded_resource(resource: ResourceContents) -> Self {
        Content::EmbeddedResource(EmbeddedResource::new(resource))
    }

    /// Returns the variant's discriminator.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Text(c) => c.content_type(),
            Content::Image(c) => c.content_type(),
            Content::Audio(c) => c.content_type(),
            Content::EmbeddedResource(c) => c.content_type(),
        }
    }

    /// Returns the annotations, if any.
    #[must_use]
    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            Content::Text(c) => c.annotations.as_ref(),
            Content::Image(c) => c.annotations.as_ref(),
            Content::Audio(c) => c.annotations.as_ref(),
            Content::EmbeddedResource(c) => c.annotations.as_ref(),
        }
    }

    /// Sets the annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        let slot = match &mut self {
            Content::Text(c) => &mut c.annotations,
            Content::Image(c) => &mut c.annotations,
            Content::Audio(c) => &mut c.annotations,
            Content::EmbeddedResource(c) => &mut c.annotations,
        };
        *slot = Some(annotations);
        self
    }

    /// Returns the text if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(c) => Some(&c.text),
            _ => None,
        }
    }

    /// Decodes content, dispatching on its `type` field.
    pub fn from_value(value: Value) -> Result<Self, WireError> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(WireError::NotAnObject {
                    found: json_type_name(&other),
                });
            }
        };

        let kind = match map.get("type") {
            Some(Value::String(kind)) => kind.parse::<ContentType>().inspect_err(|_| {
                debug!(target: targets::CONTENT, "rejecting unknown content type {kind:?}");
            })?,
            Some(other) => return Err(WireError::UnknownContentType(other.to_string())),
            None => return Err(WireError::MissingContentType),
        };

        let value = Value::Object(map);
        let content = match kind {
            ContentType::Text => Content::Text(serde_json::from_value(value)?),
            ContentType::Image => Content::Image(serde_json::from_value(value)?),
            ContentType::Audio => Content::Audio(serde_json::from_value(value)?),
            ContentType::EmbeddedResource => {
                Content::EmbeddedResource(serde_json::from_value(value)?)
            }
        };
        Ok(content)
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Content::from_value(value).map_err(de::Error::custom)
    }
}

impl From<TextContent> for Content {
    fn from(content: TextContent) -> Self {
        Content::Text(content)
    }
}

impl From<ImageContent> for Content {
    fn from(content: ImageContent) -> Self {
        Content::Image(content)
    }
}

impl From<AudioContent> for Content {
    fn from(content: AudioContent) -> Self {
        Content::Audio(content)
    }
}

impl From<EmbeddedResource> for Content {
    fn from(content: EmbeddedResource) -> Self {
        Content::EmbeddedResource(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::json;

    #[test]
    fn constructors_stamp_discriminator() {
        assert_eq!(TextContent::new("hi").content_type(), "text");
        assert_eq!(ImageContent::new("QQ==", "image/png").content_type(), "image");
        assert_eq!(AudioContent::new("QQ==", "audio/wav").content_type(), "audio");
        assert_eq!(
            EmbeddedResource::new(ResourceContents::text("mem://a", "a")).content_type(),
            "embedded_resource"
        );
        assert!(TextContent::new("hi").annotations.is_none());
    }

    #[test]
    fn text_serialization() {
        let value = serde_json::to_value(Content::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }

    #[test]
    fn image_decodes_from_wire() {
        let content: Content = serde_json::from_value(json!({
            "type": "image",
            "data": "QQ==",
            "mimeType": "image/png"
        }))
        .unwrap();

        let Content::Image(image) = content else {
            panic!("expected image content");
        };
        assert_eq!(image.data, "QQ==");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.decode_data().unwrap(), b"A");
    }

    #[test]
    fn audio_serialization() {
        let audio = AudioContent::from_bytes(&[0, 1, 2], "audio/wav");
        let value = serde_json::to_value(Content::from(audio)).unwrap();
        assert_eq!(
            value,
            json!({"type": "audio", "data": "AAEC", "mimeType": "audio/wav"})
        );
    }

    #[test]
    fn embedded_resource_serialization() {
        let content = Content::embedded_resource(
            ResourceContents::text("file:///a.md", "# A").with_mime_type("text/markdown"),
        );
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["type"], "embedded_resource");
        assert_eq!(value["resource"]["uri"], "file:///a.md");
        assert_eq!(value["resource"]["mimeType"], "text/markdown");

        let back: Content = serde_json::from_value(value).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Content::from_value(json!({"type": "bogus"})).unwrap_err();
        assert!(matches!(err, WireError::UnknownContentType(ref t) if t == "bogus"));

        assert!(serde_json::from_value::<Content>(json!({"type": "bogus"})).is_err());
        assert!(serde_json::from_str::<Content>(r#"{"type":"resource","resource":{}}"#).is_err());
    }

    #[test]
    fn missing_or_non_string_type_is_rejected() {
        let err = Content::from_value(json!({"text": "hi"})).unwrap_err();
        assert!(matches!(err, WireError::MissingContentType));

        let err = Content::from_value(json!({"type": 3, "text": "hi"})).unwrap_err();
        assert!(matches!(err, WireError::UnknownContentType(_)));

        let err = Content::from_value(json!("text")).unwrap_err();
        assert!(matches!(err, WireError::NotAnObject { found: "string" }));
    }

    #[test]
    fn variant_struct_rejects_foreign_discriminator() {
        let result = serde_json::from_value::<TextContent>(json!({"type": "image", "text": "hi"}));
        assert!(result.is_err());

        let result = serde_json::from_value::<TextContent>(json!({"text": "hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_variant_fields_fail() {
        let err = Content::from_value(json!({"type": "image", "data": "QQ=="})).unwrap_err();
        assert!(matches!(err, WireError::Json(_)));
    }

    #[test]
    fn annotations_round_trip() {
        let content = Content::text("hi")
            .with_annotations(Annotations::for_audience([Role::Assistant]).with_priority(0.5));
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "text",
                "text": "hi",
                "annotations": {"audience": ["assistant"], "priority": 0.5}
            })
        );
        let back: Content = serde_json::from_value(value).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn empty_audience_is_not_absent_annotations() {
        let with_empty: Content = serde_json::from_value(json!({
            "type": "text",
            "text": "hi",
            "annotations": {"audience": []}
        }))
        .unwrap();
        assert_eq!(
            with_empty.annotations().and_then(|a| a.audience.as_deref()),
            Some(&[][..])
        );

        let bare: Content = serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
        assert!(bare.annotations().is_none());

        assert_eq!(
            serde_json::to_value(&with_empty).unwrap()["annotations"],
            json!({"audience": []})
        );
    }

    #[test]
    fn invalid_base64_is_reported() {
        let image = ImageContent::new("***", "image/png");
        assert!(matches!(image.decode_data(), Err(WireError::Base64(_))));
    }

    #[test]
    fn content_type_parsing() {
        for kind in ContentType::ALL {
            assert_eq!(kind.as_str().parse::<ContentType>().unwrap(), kind);
        }
        assert!("resource".parse::<ContentType>().is_err());
        assert_eq!(ContentType::EmbeddedResource.to_string(), "embedded_resource");
    }

    #[test]
    fn as_text_only_matches_text() {
        assert_eq!(Content::text("hi").as_text(), Some("hi"));
        assert_eq!(Content::image("QQ==", "image/png").as_text(), None);
    }
}
