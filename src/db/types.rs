//! PostgreSQL value mappings.
//!
//! Rows fetched through the simple-query protocol arrive in text format, so
//! every value can be read as its textual representation. The column type only
//! decides how that text is rendered:
//! 1. `TypeCategory` classifies the column type name
//! 2. `decode_cell` turns the raw text into a [`CellValue`]

use crate::models::CellValue;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Unknown,
}

/// Classify a PostgreSQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }

    // Arrays, ranges and intervals start with "int" but are not numbers
    if lower.ends_with("[]") || lower.contains("range") || lower == "interval" {
        return TypeCategory::Unknown;
    }

    if lower.starts_with("int")
        || lower.contains("serial")
        || matches!(lower.as_str(), "bigint" | "smallint" | "oid")
    {
        return TypeCategory::Integer;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if lower == "real" || lower == "float4" || lower == "float8" || lower.contains("double") {
        return TypeCategory::Float;
    }

    // Default to text for everything else (varchar, text, date, uuid, json, etc.)
    TypeCategory::Unknown
}

/// Convert a raw text value into a cell.
pub fn decode_cell(raw: Option<String>, category: TypeCategory) -> CellValue {
    let Some(text) = raw else {
        return CellValue::Null;
    };
    match category {
        TypeCategory::Integer | TypeCategory::Float | TypeCategory::Decimal => {
            CellValue::Number(text)
        }
        TypeCategory::Boolean => match text.as_str() {
            "t" | "true" => CellValue::Bool(true),
            "f" | "false" => CellValue::Bool(false),
            _ => CellValue::Text(text),
        },
        TypeCategory::Unknown => CellValue::Text(text),
    }
}

/// Trait for converting database rows to stringified cells.
pub trait RowToCells {
    fn to_cells(&self) -> Vec<CellValue>;
}

impl RowToCells for PgRow {
    fn to_cells(&self) -> Vec<CellValue> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name());
                let raw = match self.try_get_unchecked::<Option<String>, _>(idx) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(column = col.name(), error = %e, "Failed to read column as text");
                        None
                    }
                };
                decode_cell(raw, category)
            })
            .collect()
    }
}
