//! Configuration management for the MCP server.
//!
//! Configuration is assembled from defaults and `MCP_`-prefixed environment
//! variables; a `.env` file in the working directory is loaded first.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default timeout for outbound HTTP requests made by tools.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tools domain configuration.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the tools domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Names of the tools to expose. `None` exposes every registered tool.
    pub enabled: Option<Vec<String>>,

    /// Timeout, in seconds, for outbound HTTP requests made by tools.
    pub http_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// weatherapi.com key used by the weather tool.
    pub weather_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for filesystem tools.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be followed at all.
    /// Symlinks resolving outside the root are rejected either way.
    pub allow_symlinks: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "tool-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tools: ToolsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(enabled) = std::env::var("MCP_TOOLS_ENABLED") {
            config.tools.enabled = parse_tool_list(&enabled);
        }

        if let Some(secs) = std::env::var("MCP_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.tools.http_timeout_secs = secs;
        }

        config.credentials.weather_api_key = std::env::var("MCP_WEATHER_API_KEY")
            .or_else(|_| std::env::var("WEATHER_API_KEY"))
            .ok();

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
        }

        config
    }

    /// Log a summary of the effective configuration.
    ///
    /// Called once logging is initialized, which happens after loading.
    pub fn log_summary(&self) {
        match &self.tools.enabled {
            Some(enabled) => info!("Tool allow-list: {}", enabled.join(", ")),
            None => info!("Tool allow-list: all tools"),
        }
        if self.credentials.weather_api_key.is_none() {
            warn!("No weather API key set (MCP_WEATHER_API_KEY); get_weather calls will fail");
        }
        match &self.security.root_path {
            Some(root) => info!("Filesystem tools restricted to {:?}", root),
            None => warn!(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 All filesystem paths will be allowed."
            ),
        }
    }
}

/// Parse a comma-separated list of tool names; blank input means "all".
fn parse_tool_list(raw: &str) -> Option<Vec<String>> {
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!names.is_empty()).then_some(names)
}
