//! SQL text builders for the CRUD statements of a table.
//!
//! Every builder works from a [`TableSchema`] and produces statement text
//! with named `:column` placeholders, ready to be executed with named
//! parameters. Column names are quoted with backticks, which SQLite accepts
//! alongside standard double quotes.
//!
//! # Examples
//!
//! ```
//! use txkit_core::*;
//!
//! let table = TableSchema::new("Alert", "alerts", "id")
//!     .with_column(ColumnSchema::new("id", ColumnType::Integer))
//!     .with_column(ColumnSchema::new("title", ColumnType::Text));
//!
//! assert_eq!(select_sql(&table), "SELECT `id`, `title` FROM alerts");
//! assert_eq!(
//!     insert_sql(&table),
//!     "INSERT INTO alerts (`id`, `title`) VALUES (:id, :title)"
//! );
//! ```

use crate::{ACTIVE, CREATED_AT, TableSchema};

/// Returns the fully-qualified reference `` `table`.`column` ``.
pub fn column_ref(table: &str, column: &str) -> String {
    format!("`{table}`.`{column}`")
}

fn quoted_columns(table: &TableSchema) -> String {
    table
        .columns
        .iter()
        .map(|c| format!("`{}`", c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_clause(table: &TableSchema) -> String {
    format!("`{key}`=:{key}", key = table.key)
}

/// `SELECT` of every column, without a `WHERE` clause.
pub fn select_sql(table: &TableSchema) -> String {
    format!("SELECT {} FROM {}", quoted_columns(table), table.table)
}

/// `INSERT` of every column.
pub fn insert_sql(table: &TableSchema) -> String {
    let placeholders = table
        .columns
        .iter()
        .map(|c| format!(":{}", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.table,
        quoted_columns(table),
        placeholders
    )
}

/// `UPDATE` of every non-key column, matched on the key.
pub fn update_sql(table: &TableSchema) -> String {
    let assignments = table
        .columns
        .iter()
        .filter(|c| c.name != table.key)
        .map(|c| format!("`{name}`=:{name}", name = c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {}",
        table.table,
        assignments,
        key_clause(table)
    )
}

/// Upsert: insert every column, or on key conflict overwrite every column
/// except the key and `created_at`.
///
/// ```
/// use txkit_core::*;
///
/// let table = TableSchema::new("Alert", "alerts", "id")
///     .with_column(ColumnSchema::new("id", ColumnType::Integer))
///     .with_column(ColumnSchema::new("title", ColumnType::Text))
///     .with_column(ColumnSchema::new("created_at", ColumnType::Timestamp));
///
/// assert!(insert_or_update_sql(&table)
///     .ends_with("ON CONFLICT(`id`) DO UPDATE SET `title`=excluded.`title`"));
/// ```
pub fn insert_or_update_sql(table: &TableSchema) -> String {
    let assignments = table
        .columns
        .iter()
        .filter(|c| c.name != table.key && c.name != CREATED_AT)
        .map(|c| format!("`{name}`=excluded.`{name}`", name = c.name))
        .collect::<Vec<_>>();

    let conflict = if assignments.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", assignments.join(", "))
    };

    format!(
        "{} ON CONFLICT(`{}`) {}",
        insert_sql(table),
        table.key,
        conflict
    )
}

/// Delete by key.
///
/// Tables with an `active` column are soft-deleted by clearing that flag;
/// all others lose the row.
pub fn delete_sql(table: &TableSchema) -> String {
    if table.soft_delete() {
        format!(
            "UPDATE {} SET `{ACTIVE}` = 0 WHERE {}",
            table.table,
            key_clause(table)
        )
    } else {
        format!("DELETE FROM {} WHERE {}", table.table, key_clause(table))
    }
}
