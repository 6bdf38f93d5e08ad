//! Database access layer.
//!
//! This module provides database access functionality:
//! - Per-call connection lifecycle and query execution (gateway)
//! - Schema introspection
//! - Type mappings for rendering result rows

pub mod gateway;
pub mod schema;
pub mod types;

pub use gateway::Gateway;
pub use schema::SchemaInspector;
