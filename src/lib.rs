//! Tool MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes a
//! registry of named, schema-described tools to a calling agent.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the filesystem sandbox, the
//!   rmcp server handler and the transports (STDIO, TCP, HTTP)
//! - **domains::tools**: The tool registry, the dispatcher that answers
//!   `tools/list` and `tools/call`, and the bundled tool sets
//!
//! # Example
//!
//! ```rust,no_run
//! use tool_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     let listing = server.list_tools();
//!     println!("{} tools", listing.tools.len());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
