//! Schema listing models.

/// One row of the column catalog: a column of a table in the introspected schema.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
}

impl ColumnRow {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Human-readable schema listing built from catalog rows.
///
/// Rows are grouped by *consecutive* table name, so callers must pass them
/// ordered by table then column position. Groups are opened with
/// `TABLE <name> (` and intentionally left unclosed, matching the output
/// clients of this server already parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaListing {
    columns: Vec<ColumnRow>,
}

impl SchemaListing {
    pub fn new(columns: Vec<ColumnRow>) -> Self {
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of distinct consecutive table groups.
    pub fn table_count(&self) -> usize {
        let mut count = 0;
        let mut current: Option<&str> = None;
        for col in &self.columns {
            if current != Some(col.table_name.as_str()) {
                current = Some(&col.table_name);
                count += 1;
            }
        }
        count
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.columns.len() * 2);
        let mut current: Option<&str> = None;
        for col in &self.columns {
            if current != Some(col.table_name.as_str()) {
                current = Some(&col.table_name);
                lines.push(format!("TABLE {} (", col.table_name));
            }
            lines.push(format!("  {} {},", col.column_name, col.data_type));
        }
        lines.join("\n")
    }
}
