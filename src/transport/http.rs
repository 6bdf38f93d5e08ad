//! Streamable HTTP transport.
//!
//! Every HTTP session gets its own `ExplorerService`. All sessions share one
//! gateway, so they all talk to the same database.

use crate::db::Gateway;
use crate::error::{DbError, DbResult};
use crate::mcp::ExplorerService;
use crate::transport::{Transport, shutdown_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// How long open sessions get to finish after the first shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTransport {
    gateway: Arc<Gateway>,
    host: String,
    port: u16,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        gateway: Arc<Gateway>,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn router(&self) -> axum::Router {
        let gateway = self.gateway.clone();
        let service = StreamableHttpService::new(
            move || Ok(ExplorerService::new(gateway.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service rejects "/".
        if self.endpoint == "/" {
            axum::Router::new().fallback_service(service)
        } else {
            axum::Router::new().nest_service(&self.endpoint, service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            DbError::connection(
                format!("Failed to bind to {bind_addr}: {e}"),
                "Check that the port is available",
            )
        })?;
        info!(
            transport = self.name(),
            addr = %bind_addr,
            endpoint = %self.endpoint,
            "Serving MCP over HTTP"
        );

        let stop_requested = Arc::new(Notify::new());
        let notify = stop_requested.clone();
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            shutdown_signal().await;
            notify.notify_one();
        });

        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "HTTP server error");
                    return Err(DbError::internal(format!("HTTP server error: {e}")));
                }
                info!("HTTP server stopped");
            }
            _ = drain_deadline(&stop_requested) => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Once a stop is requested, resolve after [`DRAIN_TIMEOUT`] or on a second
/// signal, whichever comes first. Long-lived SSE streams would otherwise
/// hold the graceful shutdown open forever.
async fn drain_deadline(stop_requested: &Notify) {
    stop_requested.notified().await;
    info!(
        timeout_secs = DRAIN_TIMEOUT.as_secs(),
        "Draining open sessions (signal again to stop now)"
    );

    tokio::select! {
        _ = tokio::time::sleep(DRAIN_TIMEOUT) => warn!("Drain timeout elapsed, stopping"),
        _ = shutdown_signal() => warn!("Second signal received, stopping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionConfig;

    fn gateway() -> Arc<Gateway> {
        Arc::new(Gateway::new(Arc::new(ConnectionConfig::default())))
    }

    #[test]
    fn test_http_transport_addresses() {
        let transport = HttpTransport::new(gateway(), "127.0.0.1", 8000, "/mcp");
        assert_eq!(transport.name(), "http");
        assert_eq!(transport.bind_addr(), "127.0.0.1:8000");
        assert_eq!(transport.endpoint(), "/mcp");
    }

    #[test]
    fn test_router_builds_for_root_and_nested_endpoints() {
        let _ = HttpTransport::new(gateway(), "0.0.0.0", 3000, "/").router();
        let _ = HttpTransport::new(gateway(), "0.0.0.0", 3000, "/mcp").router();
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let transport = HttpTransport::new(gateway(), "127.0.0.1", port, "/");
        let err = transport.run().await.unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }), "got {err:?}");
        assert!(err.to_string().contains(&port.to_string()));
    }
}
