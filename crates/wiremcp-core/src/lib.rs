//! Core types for wiremcp.
//!
//! This crate provides the ambient pieces shared by the wire-format crates:
//! - [`McpError`] and [`McpErrorCode`], the JSON-RPC error taxonomy
//! - The [`logging`] facade and its log targets

#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{McpError, McpErrorCode, McpResult};
