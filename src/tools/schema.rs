//! The schema resource.
//!
//! Exposes the column listing of the configured schema under `schema://main`.
//! `schema/main` is accepted as an alias, and leading slashes are ignored.

use crate::db::Gateway;
use crate::error::{DbError, DbResult};
use rmcp::model::{AnnotateAble, RawResource, Resource};
use std::sync::Arc;
use tracing::info;

pub const SCHEMA_RESOURCE_URI: &str = "schema://main";

const SCHEMA_RESOURCE_ALIASES: &[&str] = &[SCHEMA_RESOURCE_URI, "schema/main"];

/// The descriptor advertised by resources/list.
pub fn schema_resource() -> Resource {
    let mut raw = RawResource::new(SCHEMA_RESOURCE_URI, "schema");
    raw.description = Some("Tables and columns of the database, one TABLE block per table".into());
    raw.mime_type = Some("text/plain".into());
    raw.no_annotation()
}

/// Returns true if `uri` names the schema resource.
pub fn is_schema_uri(uri: &str) -> bool {
    let name = uri.trim_start_matches('/');
    SCHEMA_RESOURCE_ALIASES.contains(&name)
}

/// Handler for reading the schema resource.
pub struct SchemaResourceHandler {
    gateway: Arc<Gateway>,
}

impl SchemaResourceHandler {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Resolve `uri` and return the schema listing.
    ///
    /// The URI is checked before any connection is opened.
    pub async fn read(&self, uri: &str) -> DbResult<String> {
        if !is_schema_uri(uri) {
            return Err(DbError::unknown_resource(uri));
        }
        info!(uri = %uri, "Reading schema resource");
        self.gateway.fetch_schema().await
    }
}
