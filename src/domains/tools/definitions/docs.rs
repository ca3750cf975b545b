//! Documentation lookup tools.
//!
//! `get_docs` resolves documentation links for a handful of ecosystems. The
//! OpenAI, TypeScript and Express tables are static; React and AWS are
//! fetched from their mirrors. `typescript_docs` pulls raw handbook markdown.

use anyhow::{Context, anyhow, bail};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::parse_arguments;
use crate::domains::tools::descriptor::{ToolDescriptor, schema_from_json};
use crate::domains::tools::handlers::ToolHandler;

const REACT_DOCS_BASE_URL: &str =
    "https://api.github.com/repos/reactjs/react.dev/contents/src/content";
const OPENAI_API_BASE_URL: &str = "https://api.openai.com";
const AWS_DOCS_BASE_URL: &str = "https://docs.aws.amazon.com";
const TS_DOCS_BASE_URL: &str = "https://www.typescriptlang.org/docs";
const EXPRESS_DOCS_BASE_URL: &str = "https://expressjs.com";
const TS_HANDBOOK_RAW_URL: &str = concat!(
    "https://raw.githubusercontent.com/microsoft/TypeScript-Website",
    "/v2/packages/documentation/copy/en"
);
const OPENAI_REFERENCE_URL: &str = "https://platform.openai.com/docs/api-reference";

/// OpenAI sections: (name, reference page, API path).
const OPENAI_SECTIONS: &[(&str, &str, &str)] = &[
    ("overview", "/introduction", "/v1"),
    (
        "whisper",
        "/audio/createTranscription",
        "/v1/audio/transcriptions",
    ),
    ("audio", "/audio", "/v1"),
    ("assistants", "/assistants", "/v1/assistants"),
    ("models", "/models", "/v1/models"),
    ("chat", "/chat", "/v1/chat/completions"),
];

const TYPESCRIPT_SECTIONS: &[(&str, &str)] = &[
    ("overview", "/handbook/intro"),
    ("interfaces", "/handbook/interfaces"),
    ("types", "/handbook/basic-types"),
    ("classes", "/handbook/classes"),
    ("functions", "/handbook/functions"),
    ("generics", "/handbook/generics"),
    ("enums", "/handbook/enums"),
    ("decorators", "/handbook/decorators"),
    ("utility-types", "/handbook/utility-types"),
    ("declaration-files", "/handbook/declaration-files"),
    ("jsx", "/handbook/jsx"),
    ("modules", "/handbook/modules"),
    ("namespaces", "/handbook/namespaces"),
    ("type-compatibility", "/handbook/type-compatibility"),
    ("type-inference", "/handbook/type-inference"),
    ("type-manipulation", "/handbook/type-manipulation"),
    ("symbols", "/handbook/symbols"),
    ("iterators-generators", "/handbook/iterators-generators"),
    ("module-resolution", "/handbook/module-resolution"),
    ("namespaces-modules", "/handbook/namespaces-modules"),
    ("declaration-merging", "/handbook/declaration-merging"),
    ("mixins", "/handbook/mixins"),
    (
        "triple-slash-directives",
        "/handbook/triple-slash-directives",
    ),
    (
        "type-checking-javascript",
        "/handbook/type-checking-javascript",
    ),
    ("advanced-types", "/handbook/advanced-types"),
];

const EXPRESS_SECTIONS: &[(&str, &str)] = &[
    ("overview", "/en/guide/routing.html"),
    ("routing", "/en/guide/routing.html"),
    ("middleware", "/en/guide/using-middleware.html"),
    ("error-handling", "/en/guide/error-handling.html"),
    ("database", "/en/guide/database-integration.html"),
    ("api-reference", "/en/4x/api.html"),
];

const AWS_SECTIONS: &[(&str, &str)] = &[
    ("overview", "/"),
    ("getting-started", "/getting-started"),
    ("s3", "/s3"),
    ("lambda", "/lambda"),
    ("api-gateway", "/api-gateway"),
    ("eventbridge", "/eventbridge"),
    ("sqs", "/sqs"),
    ("rds", "/rds"),
    ("postgresql", "/rds/postgresql"),
    ("audio-processing", "/lambda/audio-processing"),
    ("websockets", "/api-gateway/websockets"),
    ("file-upload", "/s3/file-upload"),
    ("presigned-urls", "/s3/presigned-urls"),
    ("event-processing", "/eventbridge/processing"),
    ("dead-letter-queues", "/sqs/dead-letter-queues"),
    ("database", "/rds/database"),
    ("sdk-js", "/sdk-for-javascript"),
    ("cli", "/cli"),
    ("iam", "/iam"),
    ("security", "/security"),
];

// ============================================================================
// get_docs
// ============================================================================

/// Parameters for the documentation tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DocsParams {
    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(default)]
    pub path: Option<String>,
}

/// Documentation tool - resolves docs for several ecosystems.
#[derive(Debug, Clone)]
pub struct DocsTool {
    client: reqwest::Client,
}

impl DocsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_docs";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Retrieves React, OpenAI, AWS, TypeScript, or Express documentation";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        let schema = schema_from_json(json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "description": "Type of documentation to retrieve (react, openai, aws, typescript, or express)",
                    "enum": ["react", "openai", "aws", "typescript", "express"]
                },
                "path": {
                    "type": "string",
                    "description": "Path to specific documentation section"
                }
            },
            "required": ["type"]
        }));
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, schema, self)
    }

    #[instrument(skip(self))]
    async fn fetch_react(&self, path: &str) -> anyhow::Result<Value> {
        let url = format!("{}{}", REACT_DOCS_BASE_URL, path);
        info!("Fetching React docs from {}", url);
        let fetch = async {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        };
        fetch
            .await
            .map_err(|e| anyhow!("Failed to fetch React documentation: {}", e))
    }

    #[instrument(skip(self))]
    async fn fetch_aws(&self, path: &str) -> anyhow::Result<Value> {
        let url = format!("{}{}", AWS_DOCS_BASE_URL, aws_path(path));
        info!("Fetching AWS docs from {}", url);
        let fetch = async {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        };
        fetch
            .await
            .map(Value::String)
            .map_err(|e| anyhow!("Failed to fetch AWS documentation: {}", e))
    }
}

#[async_trait::async_trait]
impl ToolHandler for DocsTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: DocsParams = parse_arguments(arguments)?;
        let path = params.path.unwrap_or_default();

        match params.doc_type.to_lowercase().as_str() {
            "react" => self.fetch_react(&path).await,
            "openai" => Ok(openai_docs(&path)),
            "aws" => self.fetch_aws(&path).await,
            "typescript" => Ok(section_docs(TS_DOCS_BASE_URL, TYPESCRIPT_SECTIONS, &path)),
            "express" => Ok(section_docs(EXPRESS_DOCS_BASE_URL, EXPRESS_SECTIONS, &path)),
            _ => bail!(
                "Invalid documentation type. Must be \"react\", \"openai\", \"aws\", \"typescript\", or \"express\""
            ),
        }
    }
}

/// Static OpenAI API reference entry for a section.
fn openai_docs(path: &str) -> Value {
    let key = path.to_lowercase();
    let (name, doc_page, api_path) = OPENAI_SECTIONS
        .iter()
        .find(|(name, _, _)| *name == key)
        .unwrap_or(&OPENAI_SECTIONS[0]);

    let parameters = if *name == "whisper" {
        json!({
            "file": "(Required) The audio file to transcribe",
            "model": "(Required) ID of the model to use (e.g., \"whisper-1\")",
            "language": "(Optional) The language of the input audio",
            "prompt": "(Optional) An optional text to guide the model's style",
            "response_format": "(Optional) The format of the transcript output (json or text)",
            "temperature": "(Optional) The sampling temperature between 0 and 1"
        })
    } else {
        json!({})
    };

    json!({
        "documentationUrl": format!("{}{}", OPENAI_REFERENCE_URL, doc_page),
        "apiEndpoint": format!("{}{}", OPENAI_API_BASE_URL, api_path),
        "apiVersion": "v1",
        "requiredHeaders": {
            "Authorization": "Bearer $OPENAI_API_KEY",
            "Content-Type": "multipart/form-data"
        },
        "parameters": parameters
    })
}

/// Link to one section plus the table of all sections.
fn section_docs(base_url: &str, sections: &[(&str, &str)], path: &str) -> Value {
    let key = path.to_lowercase();
    let doc_path = sections
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, p)| *p)
        .unwrap_or(sections[0].1);

    let listing: Vec<Value> = sections
        .iter()
        .map(|(name, p)| json!({ "name": name, "url": format!("{}{}", base_url, p) }))
        .collect();

    json!({
        "documentationUrl": format!("{}{}", base_url, doc_path),
        "sections": listing
    })
}

/// AWS paths are looked up verbatim; unknown ones are used as-is.
fn aws_path(path: &str) -> &str {
    AWS_SECTIONS
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, p)| *p)
        .unwrap_or(if path.is_empty() { "/" } else { path })
}

// ============================================================================
// typescript_docs
// ============================================================================

/// Parameters for the TypeScript handbook tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TypeScriptDocsParams {
    /// Handbook page to fetch (file name without extension)
    #[serde(default = "default_section")]
    pub section: String,
}

fn default_section() -> String {
    "handbook".to_string()
}

/// TypeScript handbook tool - fetches raw handbook markdown.
#[derive(Debug, Clone)]
pub struct TypeScriptDocsTool {
    client: reqwest::Client,
}

impl TypeScriptDocsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "typescript_docs";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Fetches a page of the TypeScript handbook as raw markdown";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::for_params::<TypeScriptDocsParams>(Self::NAME, Self::DESCRIPTION, self)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, section: &str) -> anyhow::Result<String> {
        let url = format!("{}/{}.md", TS_HANDBOOK_RAW_URL, section);
        info!("Fetching TypeScript handbook page {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!(
                "Failed to fetch TypeScript docs: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            );
        }
        response
            .text()
            .await
            .context("Failed to read TypeScript docs")
    }
}

#[async_trait::async_trait]
impl ToolHandler for TypeScriptDocsTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: TypeScriptDocsParams = parse_arguments(arguments)?;
        let content = self
            .fetch(&params.section)
            .await
            .map_err(|e| anyhow!("TypeScript docs fetch failed: {}", e))?;

        Ok(json!({
            "content": content,
            "source": "TypeScript Documentation",
            "section": params.section
        }))
    }
}

/// All tools of this set.
pub fn tools(client: reqwest::Client) -> Vec<ToolDescriptor> {
    vec![
        DocsTool::new(client.clone()).descriptor(),
        TypeScriptDocsTool::new(client).descriptor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn docs_tool() -> DocsTool {
        DocsTool::new(reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_openai_whisper_section() {
        let result = docs_tool()
            .invoke(args(json!({ "type": "openai", "path": "Whisper" })))
            .await
            .unwrap();
        assert_eq!(
            result["apiEndpoint"],
            json!("https://api.openai.com/v1/audio/transcriptions")
        );
        assert!(result["parameters"].get("model").is_some());
    }

    #[tokio::test]
    async fn test_openai_unknown_section_falls_back_to_overview() {
        let result = docs_tool()
            .invoke(args(json!({ "type": "openai", "path": "nope" })))
            .await
            .unwrap();
        assert_eq!(
            result["documentationUrl"],
            json!("https://platform.openai.com/docs/api-reference/introduction")
        );
        assert_eq!(result["parameters"], json!({}));
    }

    #[tokio::test]
    async fn test_typescript_sections_are_static() {
        let result = docs_tool()
            .invoke(args(json!({ "type": "TypeScript", "path": "generics" })))
            .await
            .unwrap();
        assert_eq!(
            result["documentationUrl"],
            json!("https://www.typescriptlang.org/docs/handbook/generics")
        );
        assert_eq!(
            result["sections"].as_array().unwrap().len(),
            TYPESCRIPT_SECTIONS.len()
        );
    }

    #[tokio::test]
    async fn test_express_defaults_to_routing() {
        let result = docs_tool()
            .invoke(args(json!({ "type": "express" })))
            .await
            .unwrap();
        assert_eq!(
            result["documentationUrl"],
            json!("https://expressjs.com/en/guide/routing.html")
        );
    }

    #[tokio::test]
    async fn test_invalid_type() {
        let err = docs_tool()
            .invoke(args(json!({ "type": "cobol" })))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid documentation type"));
    }

    #[test]
    fn test_aws_path_mapping() {
        assert_eq!(aws_path("s3"), "/s3");
        assert_eq!(aws_path(""), "/");
        assert_eq!(aws_path("/custom/page"), "/custom/page");
    }

    #[test]
    fn test_typescript_docs_default_section() {
        let params: TypeScriptDocsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.section, "handbook");
    }

    // Integration test (requires network)
    #[ignore]
    #[tokio::test]
    async fn test_fetch_typescript_handbook() {
        let tool = TypeScriptDocsTool::new(reqwest::Client::new());
        let result = tool
            .invoke(args(json!({ "section": "handbook" })))
            .await
            .unwrap();
        assert_eq!(result["source"], json!("TypeScript Documentation"));
    }
}
