//! Connection gateway.
//!
//! Every operation opens its own connection from the fixed configuration and
//! closes it before returning, on success and on error alike. Nothing is
//! pooled or reused between calls, and connection failures are never retried.

use crate::db::schema::SchemaInspector;
use crate::db::types::RowToCells;
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, QueryOutcome};
use futures_util::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Connection, Either, PgConnection};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Gateway {
    config: Arc<ConnectionConfig>,
}

impl Gateway {
    pub fn new(config: Arc<ConnectionConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a new connection.
    pub async fn connect(&self) -> DbResult<PgConnection> {
        debug!(target_db = %self.config, "Opening database connection");
        let options = self.config.connect_options();
        PgConnection::connect_with(&options)
            .await
            .map_err(|e| match DbError::from(e) {
                err @ DbError::Connection { .. } => err,
                other => DbError::connection(
                    other.to_string(),
                    "Check that PostgreSQL is running and the connection settings are correct",
                ),
            })
    }

    /// Fetch the formatted schema listing.
    ///
    /// Both connection and introspection failures are hard errors.
    pub async fn fetch_schema(&self) -> DbResult<String> {
        let mut conn = self.connect().await?;
        let result = SchemaInspector::list_columns(&mut conn, &self.config.schema).await;
        release(conn).await;
        Ok(result?.render())
    }

    /// Run caller-supplied SQL verbatim and render the rows of its last
    /// statement.
    ///
    /// Only a failure to open the connection is a hard error. Anything that
    /// goes wrong while the statement runs comes back as
    /// [`QueryOutcome::Failed`].
    pub async fn execute_query(&self, sql: &str) -> DbResult<QueryOutcome> {
        let mut conn = self.connect().await?;
        let start = Instant::now();

        let result = last_statement_rows(&mut conn, sql).await;
        release(conn).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(rows) => {
                debug!(rows = rows.len(), elapsed_ms, "Query executed");
                Ok(QueryOutcome::from_rows(rows.iter().map(|r| r.to_cells())))
            }
            Err(e) => {
                let message = failure_message(&e);
                debug!(error = %message, elapsed_ms, "Query failed");
                Ok(QueryOutcome::failed(message))
            }
        }
    }
}

/// Run `sql` and keep only the rows produced by its final statement.
///
/// Raw SQL goes through the simple-query protocol: values arrive in text
/// format and several statements may be sent at once. Each statement ends
/// with a `Left` completion.
async fn last_statement_rows(
    conn: &mut PgConnection,
    sql: &str,
) -> Result<Vec<PgRow>, sqlx::Error> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(conn);
    let mut current = Vec::new();
    let mut last = Vec::new();
    while let Some(step) = stream.try_next().await? {
        match step {
            Either::Left(_) => last = std::mem::take(&mut current),
            Either::Right(row) => current.push(row),
        }
    }
    if !current.is_empty() {
        last = current;
    }
    Ok(last)
}

async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection cleanly");
    }
}

/// Message shown after `Error: ` for a failed query.
fn failure_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
