//! Tool descriptors and their outward view.

use std::fmt;
use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::handlers::ToolHandler;

/// Static record describing one tool.
///
/// The input schema is descriptive metadata only; nothing in the registry or
/// dispatcher validates arguments against it.
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Unique, non-empty tool name.
    pub name: String,

    /// Human-readable description shown to clients.
    pub description: String,

    /// JSON-Schema-like description of accepted arguments.
    pub input_schema: Arc<JsonObject>,

    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Create a descriptor from an explicit schema object.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Arc<JsonObject>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler: Arc::new(handler),
        }
    }

    /// Create a descriptor whose schema is derived from a parameter type.
    pub fn for_params<P>(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl ToolHandler + 'static,
    ) -> Self
    where
        P: JsonSchema + 'static,
    {
        Self::new(name, description, cached_schema_for_type::<P>(), handler)
    }

    /// The handler invoked for calls to this tool.
    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// The outward view of this tool, without the handler.
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// What a client sees of a tool in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Arc<JsonObject>,
}

/// Turn a hand-written JSON schema into the shared schema object.
///
/// Anything other than a JSON object yields an empty schema.
pub fn schema_from_json(schema: Value) -> Arc<JsonObject> {
    match schema {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct EchoParams {
        /// Text to echo back.
        text: String,
    }

    fn echo(args: JsonObject) -> impl std::future::Future<Output = anyhow::Result<Value>> {
        async move { Ok(Value::Object(args)) }
    }

    #[test]
    fn test_info_omits_handler() {
        let descriptor = ToolDescriptor::new(
            "echo",
            "Echo the arguments",
            schema_from_json(json!({ "type": "object" })),
            echo,
        );

        let info = serde_json::to_value(descriptor.info()).unwrap();
        assert_eq!(
            info,
            json!({
                "name": "echo",
                "description": "Echo the arguments",
                "inputSchema": { "type": "object" }
            })
        );
    }

    #[test]
    fn test_schema_derived_from_params() {
        let descriptor = ToolDescriptor::for_params::<EchoParams>("echo", "Echo", echo);
        let properties = descriptor.input_schema.get("properties").unwrap();
        assert!(properties.get("text").is_some());
    }

    #[test]
    fn test_non_object_schema_is_empty() {
        assert!(schema_from_json(json!("nope")).is_empty());
    }

    #[test]
    fn test_debug_skips_handler() {
        let descriptor = ToolDescriptor::new("echo", "Echo", schema_from_json(json!({})), echo);
        let debug = format!("{:?}", descriptor);
        assert!(debug.contains("echo"));
        assert!(!debug.contains("handler"));
    }
}
