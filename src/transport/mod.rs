//! Transport layer for the MCP server.
//!
//! - Stdio: one client over standard input/output
//! - HTTP: Streamable HTTP sessions for network clients

pub mod http;
pub mod stdio;

pub use http::HttpTransport;
pub use stdio::StdioTransport;

use crate::error::DbResult;
use std::future::Future;
use tokio::signal;
use tracing::{info, warn};

/// A way of exposing [`crate::ExplorerService`] to clients.
pub trait Transport: Send + Sync {
    /// Serve until the client goes away or the process is asked to stop.
    fn run(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Resolve on SIGINT or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub(crate) async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
