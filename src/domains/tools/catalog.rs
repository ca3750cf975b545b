//! Tool Catalog - assembles the server's registry from every tool set.
//!
//! Each tool set in `definitions/` is an independent descriptor source. The
//! catalog folds them into one registry and applies the configured
//! allow-list. Adding a tool set means adding one `with_source` line here.

use std::time::Duration;

use tracing::info;

use super::definitions::{calculator, docs, project, weather};
use super::registry::ToolRegistry;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::security::PathSandbox;

/// User agent for outbound requests made by tools.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the registry with every tool set this server ships.
pub fn build_tool_registry(config: &Config) -> Result<ToolRegistry> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.tools.http_timeout_secs))
        .build()?;
    let sandbox = PathSandbox::new(&config.security);

    let registry = ToolRegistry::builder()
        .with_source(calculator::tools())
        .with_source(weather::tools(
            config.credentials.weather_api_key.clone(),
            client.clone(),
        ))
        .with_source(docs::tools(client))
        .with_source(project::tools(sandbox))
        .with_allow_list(config.tools.enabled.clone())
        .build()?;

    info!("Registered {} tools", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_build_registry() {
        let registry = build_tool_registry(&Config::default()).unwrap();
        assert_eq!(
            registry.tool_names(),
            vec![
                "calculate",
                "get_weather",
                "get_docs",
                "typescript_docs",
                "getProjectStructure",
                "readFile",
                "getPackageInfo",
            ]
        );
    }

    #[test]
    fn test_registry_respects_allow_list() {
        let mut config = Config::default();
        config.tools.enabled = Some(vec!["get_docs".to_string(), "calculate".to_string()]);

        let registry = build_tool_registry(&config).unwrap();
        assert_eq!(registry.tool_names(), vec!["calculate", "get_docs"]);
    }

    #[test]
    fn test_unknown_allow_list_entry_is_config_error() {
        let mut config = Config::default();
        config.tools.enabled = Some(vec!["apinow_search".to_string()]);

        let err = build_tool_registry(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
