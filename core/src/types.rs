//! Table schema type definitions.
//!
//! This module defines the declarative data model the generator consumes:
//! one [`TableSchema`] per persisted type, each listing its
//! [`ColumnSchema`] entries in declaration order. The types deserialize from
//! YAML or JSON schema files.

use serde::{Deserialize, Serialize};

/// Column that is stamped with the current time on insert.
pub const CREATED_AT: &str = "created_at";

/// Column that is stamped with the current time on insert and update.
pub const UPDATED_AT: &str = "updated_at";

/// Column whose presence turns deletes into soft deletes.
pub const ACTIVE: &str = "active";

/// Storage type of a column.
///
/// Maps a column to the Rust type used for its field in generated code.
///
/// # Examples
///
/// ```
/// use txkit_core::ColumnType;
///
/// assert_eq!(ColumnType::default(), ColumnType::Text);
/// assert_eq!(ColumnType::Integer.rust_type(), "i64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit signed integer.
    Integer,
    /// 32-bit signed integer.
    Int,
    /// Double precision float.
    Real,
    /// Boolean stored as `0`/`1`.
    Bool,
    /// UTF-8 text (the default).
    #[default]
    Text,
    /// Raw bytes.
    Blob,
    /// UTC timestamp.
    Timestamp,
}

impl ColumnType {
    /// Returns the Rust type path used for a non-nullable field of this type.
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Integer => "i64",
            Self::Int => "i32",
            Self::Real => "f64",
            Self::Bool => "bool",
            Self::Text => "String",
            Self::Blob => "Vec<u8>",
            Self::Timestamp => "chrono::DateTime<chrono::Utc>",
        }
    }
}

/// Schema for a single column.
///
/// `name` is the database column name. The generated struct field uses the
/// same name unless `field` overrides it.
///
/// # Examples
///
/// ```
/// use txkit_core::{ColumnSchema, ColumnType};
///
/// let col = ColumnSchema::new("created_at", ColumnType::Timestamp);
/// assert_eq!(col.field_name(), "created_at");
/// assert!(!col.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Database column name.
    pub name: String,
    /// Storage type.
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Whether the column accepts `NULL` (generated as `Option<T>`).
    #[serde(default)]
    pub nullable: bool,
    /// Optional struct field name overriding `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Optional human-readable comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ColumnSchema {
    /// Creates a non-nullable column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            field: None,
            comment: None,
        }
    }

    /// Marks the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the struct field name for this column.
    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

/// Schema for one persisted type and the table backing it.
///
/// # Examples
///
/// ```
/// use txkit_core::{ColumnSchema, ColumnType, TableSchema};
///
/// let table = TableSchema::new("Alert", "alerts", "id")
///     .with_column(ColumnSchema::new("id", ColumnType::Integer))
///     .with_column(ColumnSchema::new("title", ColumnType::Text));
///
/// assert_eq!(table.column_names(), vec!["id", "title"]);
/// assert!(table.find_column("title").is_some());
/// assert!(!table.has_column("active"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Name of the generated Rust type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Database table name.
    pub table: String,
    /// Primary key column.
    pub key: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
    /// Optional human-readable comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TableSchema {
    /// Creates a table schema without columns.
    pub fn new(
        type_name: impl Into<String>,
        table: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            table: table.into(),
            key: key.into(),
            columns: Vec::new(),
            comment: None,
        }
    }

    /// Appends a column.
    pub fn with_column(mut self, column: ColumnSchema) -> Self {
        self.columns.push(column);
        self
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Finds a column by name.
    pub fn find_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the table declares a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// Returns `true` if deletes should flip the `active` column instead of
    /// removing the row.
    pub fn soft_delete(&self) -> bool {
        self.has_column(ACTIVE)
    }
}
