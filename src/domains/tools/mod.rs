//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named, schema-described operations that MCP clients can list
//! and call.
//!
//! ## Architecture
//!
//! - `descriptor.rs` - Tool descriptor (name, description, schema, handler)
//! - `handlers.rs` - The async handler contract tools implement
//! - `registry.rs` - Insertion-ordered registry and its builder
//! - `dispatcher.rs` - List/call dispatch, error translation, result framing
//! - `catalog.rs` - Assembles the server's registry from every tool set
//! - `definitions/` - Tool sets (one file per set)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a `tools()` function
//! 2. Export it in `definitions/mod.rs`
//! 3. Add it as a source in `catalog.rs`
//!
//! Transports never need to change: they only talk to the dispatcher.

pub mod catalog;
pub mod definitions;
mod descriptor;
mod dispatcher;
mod error;
mod handlers;
mod registry;

pub use catalog::build_tool_registry;
pub use descriptor::{ToolDescriptor, ToolInfo, schema_from_json};
pub use dispatcher::{CallToolResponse, ContentBlock, ListToolsResponse, ToolDispatcher};
pub use error::{ErrorKind, INTERNAL_ERROR_CODE, METHOD_NOT_FOUND_CODE, ToolError};
pub use handlers::ToolHandler;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
