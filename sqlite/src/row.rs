use rusqlite::Row;

/// Builds a value from one result row.
///
/// Used by [`Tx::select`](crate::Tx::select) and
/// [`Tx::query_row`](crate::Tx::query_row). Generated types implement it by
/// reading each column by name.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::FromRow;
/// use txkit_sqlite::rusqlite::Row;
///
/// struct Pair {
///     key: String,
///     value: i64,
/// }
///
/// impl FromRow for Pair {
///     fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
///         Ok(Self {
///             key: row.get("key")?,
///             value: row.get("value")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Reads `Self` from `row`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl FromRow for i64 {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        row.get(0)
    }
}

impl FromRow for String {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        row.get(0)
    }
}
