//! Schema introspection.
//!
//! A single fixed query against `information_schema.columns`, restricted to
//! one schema and ordered by table name then column position.

use crate::error::DbResult;
use crate::models::{ColumnRow, SchemaListing};
use sqlx::PgConnection;
use tracing::debug;

mod queries {
    // information_schema columns are domain types (sql_identifier, character_data);
    // cast to text so they decode as String. Tables sort bytewise whatever the
    // database collation.
    pub const LIST_COLUMNS: &str = r#"
        SELECT
            table_name::text AS table_name,
            column_name::text AS column_name,
            data_type::text AS data_type
        FROM
            information_schema.columns
        WHERE
            table_schema = $1
        ORDER BY
            table_name COLLATE "C",
            ordinal_position
        "#;
}

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// Read every column of every table in `schema`.
    pub async fn list_columns(conn: &mut PgConnection, schema: &str) -> DbResult<SchemaListing> {
        let rows = sqlx::query_as::<_, ColumnRow>(queries::LIST_COLUMNS)
            .bind(schema)
            .fetch_all(conn)
            .await?;

        let listing = SchemaListing::new(rows);
        debug!(
            schema = %schema,
            tables = listing.table_count(),
            "Fetched schema listing"
        );
        Ok(listing)
    }
}
