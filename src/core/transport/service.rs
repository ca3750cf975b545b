//! Transport service - runs the configured transport until it finishes or
//! the process receives Ctrl-C.

use tracing::{info, warn};

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Start the transport with the given MCP server.
    ///
    /// Returns when the transport ends or on Ctrl-C. In-flight tool calls
    /// are not waited for on shutdown.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        let transport = async move {
            match self.config {
                #[cfg(feature = "stdio")]
                TransportConfig::Stdio => StdioTransport::run(server).await,
                #[cfg(feature = "tcp")]
                TransportConfig::Tcp(cfg) => TcpTransport::new(cfg).run(server).await,
                #[cfg(feature = "http")]
                TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
            }
        };

        tokio::select! {
            result = transport => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Interrupt received, stopping transport");
                Ok(())
            }
        }
    }
}
