//! MCP service implementation using rmcp.
//!
//! `ExplorerService` routes protocol requests to the gateway. It holds no
//! per-request state; every call opens and closes its own connection.

use crate::db::Gateway;
use crate::error::{DbError, DbResult};
use crate::tools::query::{QUERY_TOOL_NAME, QueryDataInput, QueryToolHandler, query_tool};
use crate::tools::schema::{SchemaResourceHandler, schema_resource};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListResourcesResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo, Tool,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct ExplorerService {
    /// Shared gateway for all database operations
    gateway: Arc<Gateway>,
}

impl ExplorerService {
    /// Create a new ExplorerService instance.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// All tools offered by this server. Always the same single descriptor.
    pub fn tools(&self) -> Vec<Tool> {
        vec![query_tool()]
    }

    /// Dispatch a tool call by name.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> DbResult<CallToolResult> {
        if name != QUERY_TOOL_NAME {
            return Err(DbError::unknown_tool(name));
        }
        let input = QueryDataInput::from_arguments(arguments)?;
        let text = QueryToolHandler::new(self.gateway.clone())
            .query(input)
            .await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Read a resource by URI and return its text body.
    pub async fn read_resource_text(&self, uri: &str) -> DbResult<String> {
        SchemaResourceHandler::new(self.gateway.clone())
            .read(uri)
            .await
    }
}

impl ServerHandler for ExplorerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "pg-explorer-mcp".to_owned(),
                title: Some("PostgreSQL Explorer".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "PostgreSQL explorer.\n\
                \n\
                ## Workflow\n\
                1. Read the `schema://main` resource to see every table and its columns\n\
                2. Call `query_data` with a `sql` argument to run a query\n\
                \n\
                ## Results\n\
                - One row per line, formatted as a tuple literal: `(1, 'alice', None)`\n\
                - A failed query still succeeds as a tool call; its text starts with `Error: `\n\
                \n\
                SQL is executed verbatim with the server's credentials."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool(&request.name, request.arguments.as_ref())
            .await
            .map_err(|e| {
                warn!(tool = %request.name, error = %e, "Tool call failed");
                McpError::from(e)
            })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![schema_resource()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self
            .read_resource_text(&request.uri)
            .await
            .map_err(|e| {
                warn!(uri = %request.uri, error = %e, "Resource read failed");
                McpError::from(e)
            })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri.clone())],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionConfig;
    use serde_json::json;

    /// A service pointed at a closed port: any call that reaches the
    /// database fails with a connection error.
    fn create_test_service() -> ExplorerService {
        let config = ConnectionConfig::new("127.0.0.1", 1, "devdb", "postgres", "postgres");
        ExplorerService::new(Arc::new(Gateway::new(Arc::new(config))))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_list_tools_is_stable() {
        let service = create_test_service();
        let first = service.tools();
        let second = service.tools();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "query_data");
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let service = create_test_service();
        let err = service
            .dispatch_tool("anything_else", Some(&args(json!({}))))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownTool { ref name } if name == "anything_else"));
    }

    #[tokio::test]
    async fn test_unknown_tool_checked_before_arguments() {
        let service = create_test_service();
        let err = service.dispatch_tool("drop_everything", None).await.unwrap_err();
        assert!(matches!(err, DbError::UnknownTool { .. }));
    }

    #[tokio::test]
    async fn test_missing_sql_argument() {
        let service = create_test_service();
        let err = service
            .dispatch_tool("query_data", Some(&args(json!({}))))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingArgument { ref argument } if argument == "sql"));

        let mcp_err = McpError::from(err);
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_query_without_database_is_hard_error() {
        let service = create_test_service();
        let err = service
            .dispatch_tool("query_data", Some(&args(json!({ "sql": "SELECT 1" }))))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let service = create_test_service();
        let err = service
            .read_resource_text("schema://other")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownResource { .. }));
        assert_eq!(McpError::from(err).code.0, -32002);
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "pg-explorer-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }
}
