//! Tool dispatcher - answers list and call requests against the registry.
//!
//! The dispatcher owns error translation and result framing and nothing
//! else: it does not validate arguments, retry, time out, or serialize
//! concurrent calls. Each call is independent.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::descriptor::ToolInfo;
use super::error::ToolError;
use super::registry::ToolRegistry;

// ============================================================================
// Envelopes
// ============================================================================

/// Response to a list request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolInfo>,
}

/// One block of call output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Successful response to a call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResponse {
    pub content: Vec<ContentBlock>,
}

impl CallToolResponse {
    /// A response made of a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// The text of the first block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes list and call requests to the tool registry.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    /// Create a dispatcher over a finished registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher consults.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// List every registered tool. Never fails.
    #[instrument(skip(self))]
    pub fn handle_list(&self) -> ListToolsResponse {
        let tools: Vec<ToolInfo> = self.registry.list_all().collect();
        info!("Listing {} tools", tools.len());
        ListToolsResponse { tools }
    }

    /// Call the tool registered under `name`.
    ///
    /// Absent arguments are passed to the handler as an empty object. On
    /// success the handler's value is pretty-printed as JSON into a single
    /// text block. A handler error, a handler panic, or a serialization
    /// failure all become one [`ToolError::Internal`].
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn handle_call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResponse, ToolError> {
        let Some(descriptor) = self.registry.resolve(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        info!("Calling tool: {}", name);
        let handler = descriptor.handler().clone();
        let outcome = AssertUnwindSafe(handler.invoke(arguments.unwrap_or_default()))
            .catch_unwind()
            .await;

        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!("Tool {} failed: {}", name, e);
                return Err(ToolError::from_handler_error(&e));
            }
            Err(panic) => {
                error!("Tool {} panicked", name);
                return Err(ToolError::from_panic(panic.as_ref()));
            }
        };

        let text = serde_json::to_string_pretty(&value).map_err(|e| {
            warn!("Failed to serialize result of {}: {}", name, e);
            ToolError::internal(e.to_string())
        })?;

        Ok(CallToolResponse::text(text))
    }
}
