//! MCP wire types.
//!
//! This crate provides:
//! - [`ExtensibleParams`], the codec that splits a flat params object into
//!   reserved `_meta` metadata and caller-defined fields, and merges them back
//! - [`Content`], the closed set of message content variants
//! - Base request/notification/result envelopes and JSON-RPC 2.0 framing
//!
//! # Wire Format
//!
//! Params are one flat JSON object. `_meta` is the only key with
//! protocol-defined meaning; every other key is round-tripped untouched:
//!
//! ```json
//! {"method": "notifications/progress",
//!  "params": {"_meta": {"progressToken": 1}, "progress": 0.5}}
//! ```
//!
//! Content objects carry a `type` discriminator, one of `text`, `image`,
//! `audio` or `embedded_resource`, plus an optional `annotations` object.

#![forbid(unsafe_code)]

mod content;
mod error;
mod jsonrpc;
mod messages;
mod params;
mod types;

pub use content::{AudioContent, Content, ContentType, EmbeddedResource, ImageContent, TextContent};
pub use error::WireError;
pub use jsonrpc::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use messages::{NEXT_CURSOR_KEY, Notification, PaginatedResult, Request};
pub use params::{
    ExtensibleParams, META_KEY, Meta, NotificationParams, PROGRESS_TOKEN_KEY, RequestParams,
    ResultFields,
};
pub use types::{Annotations, Cursor, ProgressToken, ResourceContents, Role};
