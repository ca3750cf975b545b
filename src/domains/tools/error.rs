//! Tool-specific error types.
//!
//! Every failure that leaves the dispatcher is one of two kinds: the tool
//! name did not resolve, or the tool itself failed. Handlers are free to use
//! whatever error type suits them; the conversion into [`ToolError`] happens
//! once, at the dispatch boundary.

use std::any::Any;

use serde::Serialize;
use thiserror::Error;

/// JSON-RPC code for an unknown method (used for unknown tools).
pub const METHOD_NOT_FOUND_CODE: i32 = -32601;

/// JSON-RPC code for an internal error.
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// Message used when a handler panics with a payload that is not a string.
const OPAQUE_PANIC_MESSAGE: &str = "Tool handler panicked";

/// Kind tag carried by every [`ToolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// No tool is registered under the requested name.
    NotFound,
    /// The tool handler failed, panicked, or produced an unserializable result.
    Internal,
}

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool '{0}' not found")]
    NotFound(String),

    /// The tool failed; the message is the handler's own, verbatim.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error for the given tool name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Normalize a handler error.
    ///
    /// Only the outermost message is kept, so a handler that fails with
    /// `anyhow!("boom")` surfaces exactly `"boom"`.
    pub fn from_handler_error(err: &anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }

    /// Normalize a panic payload caught while awaiting a handler.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            OPAQUE_PANIC_MESSAGE.to_string()
        };
        Self::Internal(message)
    }

    /// The kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message for the outward error.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// JSON-RPC error code a transport should use for this error.
    pub fn json_rpc_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => METHOD_NOT_FOUND_CODE,
            ErrorKind::Internal => INTERNAL_ERROR_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_tool() {
        let err = ToolError::not_found("does-not-exist");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Tool 'does-not-exist' not found");
        assert_eq!(err.json_rpc_code(), -32601);
    }

    #[test]
    fn test_handler_error_keeps_outer_message() {
        let err = ToolError::from_handler_error(&anyhow::anyhow!("boom"));
        assert_eq!(err, ToolError::Internal("boom".to_string()));
        assert_eq!(err.json_rpc_code(), -32603);
    }

    #[test]
    fn test_panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(
            ToolError::from_panic(payload.as_ref()).message(),
            "static message"
        );

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(
            ToolError::from_panic(payload.as_ref()).message(),
            "owned message"
        );

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(
            ToolError::from_panic(payload.as_ref()).message(),
            OPAQUE_PANIC_MESSAGE
        );
    }
}
