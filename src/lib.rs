//! PostgreSQL Explorer MCP Library
//!
//! Bridges MCP requests to a PostgreSQL database: one tool (`query_data`)
//! that runs SQL verbatim and one resource (`schema://main`) that lists every
//! column of the configured schema.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::ExplorerService;
