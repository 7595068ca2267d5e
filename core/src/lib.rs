//! Declarative table schemas for the txkit generator.
//!
//! This crate defines the data model the code generator consumes and the
//! SQL text it derives from it:
//!
//! - [`TableSchema`]: one persisted type, its table, key and columns.
//! - [`ColumnSchema`]: a column with storage type and nullability.
//! - [`SchemaFile`]: the contents of one YAML/JSON schema file.
//!
//! Validation ([`validate_table`], [`validate_file`]) rejects declarations
//! that would produce broken SQL or uncompilable code. The `sql` builders
//! ([`select_sql`], [`insert_sql`], [`update_sql`],
//! [`insert_or_update_sql`], [`delete_sql`]) produce statement text with
//! named `:column` placeholders.
//!
//! # Example
//!
//! ```
//! use txkit_core::*;
//!
//! let table = TableSchema::new("Alert", "alerts", "id")
//!     .with_column(ColumnSchema::new("id", ColumnType::Integer))
//!     .with_column(ColumnSchema::new("title", ColumnType::Text))
//!     .with_column(ColumnSchema::new("active", ColumnType::Bool));
//!
//! assert!(validate_table(&table).is_empty());
//! assert_eq!(column_ref(&table.table, "title"), "`alerts`.`title`");
//! assert_eq!(
//!     delete_sql(&table),
//!     "UPDATE alerts SET `active` = 0 WHERE `id`=:id"
//! );
//! ```

mod file;
mod sql;
mod types;
mod validate;

pub use file::SchemaFile;
pub use sql::{
    column_ref, delete_sql, insert_or_update_sql, insert_sql, select_sql, update_sql,
};
pub use types::*;
pub use validate::{ValidationError, is_identifier, is_reserved, validate_file, validate_table};
