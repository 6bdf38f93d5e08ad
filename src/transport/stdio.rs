//! Stdio transport: a single client speaking JSON-RPC over stdin/stdout.

use crate::db::Gateway;
use crate::error::{DbError, DbResult};
use crate::mcp::ExplorerService;
use crate::transport::{Transport, shutdown_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StdioTransport {
    gateway: Arc<Gateway>,
}

impl StdioTransport {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!(transport = self.name(), "Serving MCP on stdin/stdout");

        let running = ExplorerService::new(self.gateway.clone())
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {e}")))?;

        tokio::select! {
            result = running.waiting() => match result {
                Ok(_) => {
                    info!("Client disconnected");
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "Stdio transport error");
                    Err(DbError::internal(format!("Stdio transport error: {e}")))
                }
            },
            _ = shutdown_signal() => {
                // A pending stdin read cannot be cancelled. No connection
                // outlives a request, so exiting here loses nothing.
                info!("Exiting process");
                std::process::exit(0);
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
