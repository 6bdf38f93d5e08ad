//! Data models for the PostgreSQL explorer.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionConfigError};
pub use query::{CellValue, QUERY_ERROR_PREFIX, QueryOutcome, format_row};
pub use schema::{ColumnRow, SchemaListing};
