//! MCP tool and resource handlers.

pub mod query;
pub mod schema;

pub use query::{QUERY_TOOL_NAME, QueryDataInput, QueryToolHandler, query_tool};
pub use schema::{SCHEMA_RESOURCE_URI, SchemaResourceHandler, schema_resource};
