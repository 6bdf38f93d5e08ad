//! The `query_data` tool.
//!
//! Runs caller-supplied SQL as-is. There is no allow-list, no parameter
//! binding and no read-only enforcement: anyone who can reach the server can
//! run any statement the configured database user is permitted to run.

use crate::db::Gateway;
use crate::error::{DbError, DbResult};
use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const QUERY_TOOL_NAME: &str = "query_data";

const QUERY_TOOL_DESCRIPTION: &str = "Execute a SQL query against the PostgreSQL database and return the rows.\n\
Each row is returned as a tuple literal on its own line, e.g. (1, 'alice').\n\
The SQL is run verbatim with the server's credentials. If the query fails the \
result text starts with 'Error: '.";

/// Input for the query_data tool.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDataInput {
    pub sql: String,
}

impl QueryDataInput {
    /// Extract the input from raw call arguments.
    ///
    /// An absent `sql` key is reported separately from a malformed one.
    pub fn from_arguments(arguments: Option<&JsonObject>) -> DbResult<Self> {
        let args = match arguments {
            Some(args) if args.contains_key("sql") => args,
            _ => return Err(DbError::missing_argument("sql")),
        };
        serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| DbError::invalid_input(format!("Invalid 'sql' argument: {e}")))
    }
}

fn input_schema() -> JsonObject {
    let schema = serde_json::json!({
        "type": "object",
        "required": ["sql"],
        "properties": {
            "sql": {
                "type": "string",
                "description": "SQL query to execute",
            }
        }
    });
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

/// The static descriptor advertised by tools/list.
pub fn query_tool() -> Tool {
    Tool::new(
        QUERY_TOOL_NAME,
        QUERY_TOOL_DESCRIPTION,
        Arc::new(input_schema()),
    )
}

/// Handler for the query_data tool.
pub struct QueryToolHandler {
    gateway: Arc<Gateway>,
}

impl QueryToolHandler {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Run the query and return the response text.
    ///
    /// Query failures are folded into the text; only connection failures are errors.
    pub async fn query(&self, input: QueryDataInput) -> DbResult<String> {
        info!(sql_len = input.sql.len(), "Running query_data");
        let outcome = self.gateway.execute_query(&input.sql).await?;
        if outcome.is_failed() {
            info!("Query returned an error message");
        }
        Ok(outcome.into_text())
    }
}
