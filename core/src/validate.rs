//! Table schema validation.
//!
//! Catches declarations that would produce broken SQL or uncompilable
//! generated code: empty or non-identifier names, duplicate columns, a key
//! that names no column, and types declared twice.
//!
//! # Examples
//!
//! ```
//! use txkit_core::*;
//!
//! let table = TableSchema::new("Alert", "alerts", "id")
//!     .with_column(ColumnSchema::new("id", ColumnType::Integer));
//! assert!(validate_table(&table).is_empty());
//!
//! // Key column not declared
//! let bad = TableSchema::new("Alert", "alerts", "uuid")
//!     .with_column(ColumnSchema::new("id", ColumnType::Integer));
//! assert!(!validate_table(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{SchemaFile, TableSchema};

/// Names that match [`IDENT_RE`] but cannot name a Rust item or field, not
/// even as raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Table schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Type name is empty or whitespace-only.
    #[error("type name cannot be empty")]
    EmptyTypeName,
    /// Table name is empty or whitespace-only.
    #[error("table name cannot be empty for type {0}")]
    EmptyTableName(String),
    /// A type, table, key or column name is not a plain identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// A type, field or key name that Rust reserves outright.
    #[error("reserved identifier: {0}")]
    ReservedIdentifier(String),
    /// Type declares no columns.
    #[error("type {0} declares no columns")]
    NoColumns(String),
    /// Two columns in one table share a name.
    #[error("duplicate column in {table}: {column}")]
    DuplicateColumn { table: String, column: String },
    /// Key column is not among the declared columns.
    #[error("key column {key} is not declared in {table}")]
    MissingKeyColumn { table: String, key: String },
    /// A type name is declared twice in one file.
    #[error("duplicate type: {0}")]
    DuplicateType(String),
}

/// Returns `true` if `name` is usable both as a SQL identifier and as a
/// Rust identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// Returns `true` if `name` cannot be used for a generated type or field.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Validates every table in a schema file and rejects duplicate types.
pub fn validate_file(file: &SchemaFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for table in &file.tables {
        if !seen.insert(table.type_name.as_str()) {
            errors.push(ValidationError::DuplicateType(table.type_name.clone()));
            return errors;
        }
        errors.extend(validate_table(table));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a single table declaration.
///
/// Stops at the first problem found.
pub fn validate_table(table: &TableSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if table.type_name.trim().is_empty() {
        errors.push(ValidationError::EmptyTypeName);
        return errors;
    }
    if table.table.trim().is_empty() {
        errors.push(ValidationError::EmptyTableName(table.type_name.clone()));
        return errors;
    }

    for name in [&table.type_name, &table.table, &table.key] {
        if !is_identifier(name) {
            errors.push(ValidationError::InvalidIdentifier(name.clone()));
            return errors;
        }
    }
    if is_reserved(&table.type_name) {
        errors.push(ValidationError::ReservedIdentifier(table.type_name.clone()));
        return errors;
    }

    if table.columns.is_empty() {
        errors.push(ValidationError::NoColumns(table.type_name.clone()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for column in &table.columns {
        for name in [column.name.as_str(), column.field_name()] {
            if !is_identifier(name) {
                errors.push(ValidationError::InvalidIdentifier(name.to_string()));
                return errors;
            }
        }
        if is_reserved(column.field_name()) {
            errors.push(ValidationError::ReservedIdentifier(
                column.field_name().to_string(),
            ));
            return errors;
        }
        if !seen.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn {
                table: table.table.clone(),
                column: column.name.clone(),
            });
            return errors;
        }
    }

    if !seen.contains(table.key.as_str()) {
        errors.push(ValidationError::MissingKeyColumn {
            table: table.table.clone(),
            key: table.key.clone(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnSchema, ColumnType};

    fn alerts() -> TableSchema {
        TableSchema::new("Alert", "alerts", "id")
            .with_column(ColumnSchema::new("id", ColumnType::Integer))
            .with_column(ColumnSchema::new("title", ColumnType::Text))
    }

    #[test]
    fn test_validate_table_accepts_valid_table() {
        assert!(validate_table(&alerts()).is_empty());
    }

    #[test]
    fn test_validate_table_rejects_duplicate_column() {
        let table = alerts().with_column(ColumnSchema::new("title", ColumnType::Text));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::DuplicateColumn {
                table: "alerts".to_string(),
                column: "title".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_table_rejects_bad_identifiers() {
        let table = TableSchema::new("Alert", "alerts; DROP TABLE x", "id")
            .with_column(ColumnSchema::new("id", ColumnType::Integer));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::InvalidIdentifier(
                "alerts; DROP TABLE x".to_string()
            )]
        );

        let mut column = ColumnSchema::new("id", ColumnType::Integer);
        column.field = Some("1id".into());
        let table = TableSchema::new("Alert", "alerts", "id").with_column(column);
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::InvalidIdentifier("1id".to_string())]
        );
    }

    #[test]
    fn test_validate_table_rejects_reserved_names() {
        let table = TableSchema::new("Self", "alerts", "id")
            .with_column(ColumnSchema::new("id", ColumnType::Integer));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::ReservedIdentifier("Self".to_string())]
        );

        let table = alerts().with_column(ColumnSchema::new("self", ColumnType::Text));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::ReservedIdentifier("self".to_string())]
        );

        let table = TableSchema::new("Alert", "alerts", "crate")
            .with_column(ColumnSchema::new("crate", ColumnType::Integer));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::ReservedIdentifier("crate".to_string())]
        );

        // The key column's field is checked like any other.
        // A reserved column name is fine once the field is renamed.
        let mut column = ColumnSchema::new("super", ColumnType::Text);
        column.field = Some("parent".into());
        assert!(validate_table(&alerts().with_column(column)).is_empty());
    }

    #[test]
    fn test_validate_table_rejects_missing_key() {
        let table = TableSchema::new("Alert", "alerts", "uuid")
            .with_column(ColumnSchema::new("id", ColumnType::Integer));
        assert_eq!(
            validate_table(&table),
            vec![ValidationError::MissingKeyColumn {
                table: "alerts".to_string(),
                key: "uuid".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_file_rejects_duplicate_type() {
        let file = SchemaFile {
            tags: Vec::new(),
            tables: vec![alerts(), alerts()],
        };
        assert_eq!(
            validate_file(&file),
            vec![ValidationError::DuplicateType("Alert".to_string())]
        );
    }
}
