//! Tool handler contract.
//!
//! A handler receives the call arguments as a JSON object and returns any
//! JSON value, or fails with an [`anyhow::Error`]. Plain async closures are
//! handlers through a blanket impl; tools that carry state (API keys, HTTP
//! clients, sandbox roots) implement the trait on their own struct.

use std::future::Future;

use rmcp::model::JsonObject;
use serde_json::Value;

/// Trait implemented by every tool body.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given arguments.
    ///
    /// Arguments are passed through exactly as the caller sent them; the
    /// handler is responsible for any validation it needs.
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value>;
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for F
where
    F: Fn(JsonObject) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        (self)(arguments).await
    }
}
