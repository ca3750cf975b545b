//! Error types and handling for the MCP server.
//!
//! Errors raised while assembling the server at start-up. Errors from tool
//! calls never reach this type; they are [`ToolError`]s answered to the
//! client.
//!
//! [`ToolError`]: crate::domains::tools::ToolError

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure to set up the outbound HTTP client used by tools.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
