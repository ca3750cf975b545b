//! MCP Server implementation and lifecycle management.
//!
//! This module contains the server handler that implements the MCP protocol
//! for tools. It holds no tool logic: `tools/list` and `tools/call` go to the
//! [`ToolDispatcher`], and the results are converted to rmcp models here.
//!
//! Error mapping: an unknown tool is reported as JSON-RPC "method not found",
//! a failing tool as "internal error".

use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{
    CallToolResponse, ContentBlock, ErrorKind, ListToolsResponse, ToolDispatcher, ToolError,
    ToolInfo, ToolRegistry, build_tool_registry,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the tool registry.
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a new MCP server exposing every configured tool set.
    pub fn new(config: Config) -> Result<Self> {
        let registry = build_tool_registry(&config)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server over an already assembled registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: ToolDispatcher::new(Arc::new(registry)),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool dispatcher.
    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Instructions sent to clients on initialize.
    pub fn instructions(&self) -> String {
        format!(
            "{} exposes {} tools. Use tools/list to discover them and tools/call to run one.",
            self.name(),
            self.dispatcher.registry().len()
        )
    }

    /// List all available tools (transport-agnostic form).
    pub fn list_tools(&self) -> ListToolsResponse {
        self.dispatcher.handle_list()
    }

    /// Call a tool by name (transport-agnostic form).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResponse, ToolError> {
        self.dispatcher.handle_call(name, arguments).await
    }
}

/// Convert a tool listing entry to the rmcp model.
fn to_mcp_tool(info: ToolInfo) -> Tool {
    Tool {
        name: info.name.into(),
        description: Some(info.description.into()),
        input_schema: info.input_schema,
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Convert a successful call to the rmcp model.
fn to_call_tool_result(response: CallToolResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => Content::text(text),
        })
        .collect();
    CallToolResult::success(content)
}

/// Convert a dispatch error to a JSON-RPC error.
fn to_mcp_error(err: ToolError) -> McpError {
    match err.kind() {
        ErrorKind::NotFound => McpError::new(ErrorCode::METHOD_NOT_FOUND, err.message(), None),
        ErrorKind::Internal => McpError::internal_error(err.message(), None),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self
            .dispatcher
            .handle_list()
            .tools
            .into_iter()
            .map(to_mcp_tool)
            .collect();
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatcher
            .handle_call(&request.name, request.arguments)
            .await
            .map(to_call_tool_result)
            .map_err(to_mcp_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolDescriptor, schema_from_json};
    use rmcp::{ServiceExt, service::ServiceError};
    use serde_json::{Value, json};

    fn test_server() -> McpServer {
        let registry: ToolRegistry = vec![ToolDescriptor::new(
            "answer",
            "Returns the answer",
            schema_from_json(json!({ "type": "object" })),
            |_args: JsonObject| async { Ok::<_, anyhow::Error>(json!({ "answer": 42 })) },
        )]
        .into_iter()
        .collect();
        McpServer::with_registry(Config::default(), registry)
    }

    #[test]
    fn test_server_from_default_config() {
        let server = McpServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "tool-mcp-server");
        assert!(!server.list_tools().tools.is_empty());
    }

    #[test]
    fn test_info_enables_tools() {
        let info = test_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("1 tools"));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = to_mcp_tool(test_server().list_tools().tools.remove(0));
        assert_eq!(tool.name, "answer");
        assert_eq!(tool.description.as_deref(), Some("Returns the answer"));
        assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
    }

    #[tokio::test]
    async fn test_call_result_conversion() {
        let response = test_server().call_tool("answer", None).await.unwrap();
        let result = to_call_tool_result(response);
        assert_eq!(result.is_error, Some(false));

        let value = serde_json::to_value(&result).unwrap();
        let text = value["content"][0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, json!({ "answer": 42 }));
    }

    #[tokio::test]
    async fn test_error_codes() {
        let err = test_server().call_tool("missing", None).await.unwrap_err();
        let mcp = to_mcp_error(err);
        assert_eq!(mcp.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(mcp.message, "Tool 'missing' not found");

        let mcp = to_mcp_error(ToolError::internal("boom"));
        assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(mcp.message, "boom");
    }

    #[tokio::test]
    async fn test_session_over_in_memory_channel() {
        let (server_io, client_io) = tokio::io::duplex(4096);
        let server = tokio::spawn(async move {
            let running = test_server().serve(server_io).await.unwrap();
            running.waiting().await.unwrap();
        });
        let client = ().serve(client_io).await.unwrap();

        let tools = client.list_all_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "answer");

        let result = client
            .call_tool(CallToolRequestParam {
                name: "answer".into(),
                arguments: None,
            })
            .await
            .unwrap();
        let text = &result.content[0].as_text().unwrap().text;
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, json!({ "answer": 42 }));

        let err = client
            .call_tool(CallToolRequestParam {
                name: "missing".into(),
                arguments: None,
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::McpError(e) => {
                assert_eq!(e.code, ErrorCode::METHOD_NOT_FOUND);
                assert_eq!(e.message, "Tool 'missing' not found");
            }
            other => panic!("expected a JSON-RPC error, got {other:?}"),
        }

        client.cancel().await.unwrap();
        server.await.unwrap();
    }
}
