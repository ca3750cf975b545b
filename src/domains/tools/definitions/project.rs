//! Project inspection tools.
//!
//! Read-only filesystem tools: a recursive tree of a directory, the content
//! of one file, and the parsed `package.json` of a directory. Every path goes
//! through the [`PathSandbox`]; blocking I/O runs on the blocking pool.

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::parse_arguments;
use crate::core::security::PathSandbox;
use crate::domains::tools::descriptor::ToolDescriptor;
use crate::domains::tools::handlers::ToolHandler;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for tools that operate on a directory.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DirectoryParams {
    /// Directory to inspect (defaults to the current directory)
    #[serde(default = "default_directory")]
    pub directory: String,
}

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileParams {
    /// Path of the file to read
    pub file_path: String,
}

fn default_directory() -> String {
    ".".to_string()
}

/// One node of a project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeEntry {
    Directory {
        name: String,
        children: Vec<TreeEntry>,
    },
    File {
        name: String,
    },
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Project structure tool - recursive listing of non-hidden entries.
#[derive(Debug, Clone)]
pub struct ProjectStructureTool {
    sandbox: PathSandbox,
}

impl ProjectStructureTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getProjectStructure";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Returns the directory tree of a project, skipping hidden files and directories";

    pub fn new(sandbox: PathSandbox) -> Self {
        Self { sandbox }
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::for_params::<DirectoryParams>(Self::NAME, Self::DESCRIPTION, self)
    }

    /// Walk the directory tree.
    #[instrument(skip(self))]
    pub fn execute(&self, directory: &str) -> anyhow::Result<Vec<TreeEntry>> {
        let path = self.sandbox.resolve(directory)?;
        if !path.is_dir() {
            return Err(anyhow!("Path is not a directory: {}", directory));
        }
        info!("Reading project structure of {}", path.display());
        read_tree(&path)
    }
}

#[async_trait::async_trait]
impl ToolHandler for ProjectStructureTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: DirectoryParams = parse_arguments(arguments)?;
        let tool = self.clone();
        let tree = tokio::task::spawn_blocking(move || tool.execute(&params.directory)).await??;
        Ok(serde_json::to_value(tree)?)
    }
}

/// Read file tool - returns the UTF-8 content of a file.
#[derive(Debug, Clone)]
pub struct ReadFileTool {
    sandbox: PathSandbox,
}

impl ReadFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "readFile";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Reads a text file and returns its content";

    pub fn new(sandbox: PathSandbox) -> Self {
        Self { sandbox }
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::for_params::<ReadFileParams>(Self::NAME, Self::DESCRIPTION, self)
    }

    #[instrument(skip(self))]
    pub fn execute(&self, file_path: &str) -> anyhow::Result<String> {
        let path = self.sandbox.resolve(file_path)?;
        info!("Reading file {}", path.display());
        fs::read_to_string(&path).map_err(|e| anyhow!("Failed to read {}: {}", file_path, e))
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReadFileTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: ReadFileParams = parse_arguments(arguments)?;
        let tool = self.clone();
        let content =
            tokio::task::spawn_blocking(move || tool.execute(&params.file_path)).await??;
        Ok(json!({ "content": content }))
    }
}

/// Package info tool - returns the parsed `package.json` of a directory.
#[derive(Debug, Clone)]
pub struct PackageInfoTool {
    sandbox: PathSandbox,
}

impl PackageInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getPackageInfo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Returns the parsed package.json of a project directory";

    pub fn new(sandbox: PathSandbox) -> Self {
        Self { sandbox }
    }

    /// Create the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::for_params::<DirectoryParams>(Self::NAME, Self::DESCRIPTION, self)
    }

    #[instrument(skip(self))]
    pub fn execute(&self, directory: &str) -> anyhow::Result<Value> {
        let manifest = Path::new(directory).join("package.json");
        let parsed = manifest
            .to_str()
            .ok_or_else(|| anyhow!("non UTF-8 path"))
            .and_then(|p| Ok(self.sandbox.resolve(p)?))
            .and_then(|path| Ok(fs::read_to_string(path)?))
            .and_then(|content| Ok(serde_json::from_str::<Value>(&content)?));

        parsed.map_err(|e| {
            warn!("Failed to load {}: {:#}", manifest.display(), e);
            anyhow!("package.json not found or invalid")
        })
    }
}

#[async_trait::async_trait]
impl ToolHandler for PackageInfoTool {
    async fn invoke(&self, arguments: JsonObject) -> anyhow::Result<Value> {
        let params: DirectoryParams = parse_arguments(arguments)?;
        let tool = self.clone();
        tokio::task::spawn_blocking(move || tool.execute(&params.directory)).await?
    }
}

/// All tools of this set, sharing one sandbox.
pub fn tools(sandbox: PathSandbox) -> Vec<ToolDescriptor> {
    vec![
        ProjectStructureTool::new(sandbox.clone()).descriptor(),
        ReadFileTool::new(sandbox.clone()).descriptor(),
        PackageInfoTool::new(sandbox).descriptor(),
    ]
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Recursively list `dir`, directories first-class, sorted by name.
///
/// Symlinks are reported as files and never followed.
fn read_tree(dir: &Path) -> anyhow::Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        if entry.file_type()?.is_dir() {
            let children = read_tree(&entry.path())?;
            entries.push(TreeEntry::Directory { name, children });
        } else {
            entries.push(TreeEntry::File { name });
        }
    }

    entries.sort_by(|a, b| entry_name(a).cmp(entry_name(b)));
    Ok(entries)
}

fn entry_name(entry: &TreeEntry) -> &str {
    match entry {
        TreeEntry::Directory { name, .. } | TreeEntry::File { name } => name,
    }
}
