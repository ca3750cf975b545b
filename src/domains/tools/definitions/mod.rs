//! Tool definitions module.
//!
//! Each file is an independent tool set exposing a `tools()` function that
//! returns its descriptors. The catalog folds the sets into one registry.

pub mod calculator;
pub mod docs;
pub mod project;
pub mod weather;

pub use calculator::CalculatorTool;
pub use docs::{DocsTool, TypeScriptDocsTool};
pub use project::{PackageInfoTool, ProjectStructureTool, ReadFileTool};
pub use weather::WeatherTool;

use anyhow::anyhow;
use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse call arguments into a tool's parameter struct.
pub(crate) fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> anyhow::Result<P> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| anyhow!("Invalid arguments: {}", e))
}
