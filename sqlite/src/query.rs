//! Query text, parameterized queries and select options.
//!
//! [`Query`] is statement text. [`Queryx`] pairs it with positional
//! parameters for ad-hoc selects. [`SelectOption`]s rewrite a `Queryx`
//! before it is run (pagination, filtering, ordering) and are applied left
//! to right, so each option sees the output of the one before it.
//!
//! # Example
//!
//! ```
//! use txkit_sqlite::{Filter, Paginate, Query, Queryx, SelectOption, apply_options};
//!
//! let base = Queryx::new(Query::from_static("SELECT id, active FROM alerts"));
//! let paged = apply_options(
//!     &base,
//!     &[&Filter::new("active = 1"), &Paginate { limit: 10, offset: 5 }],
//! );
//!
//! assert_eq!(
//!     paged.query.as_str(),
//!     "SELECT * FROM (SELECT id, active FROM alerts) f WHERE active = 1 LIMIT ? OFFSET ?"
//! );
//! assert_eq!(paged.params.len(), 2);
//! ```

use std::borrow::Cow;
use std::fmt;

use rusqlite::types::Value;

/// SQL statement text.
///
/// Named parameters are written `:name`, positional ones `?`. Generated
/// code declares queries as constants through [`Query::from_static`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(Cow<'static, str>);

impl Query {
    /// Wraps static text without allocating.
    pub const fn from_static(text: &'static str) -> Self {
        Self(Cow::Borrowed(text))
    }

    /// Wraps owned text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(Cow::Owned(text.into()))
    }

    /// Returns the statement text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Query {
    fn from(text: &'static str) -> Self {
        Self::from_static(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self(Cow::Owned(text))
    }
}

/// A query together with its positional parameters.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::Queryx;
///
/// let qx = Queryx::new("SELECT name FROM users WHERE id = ? AND active = ?")
///     .bind(7i64)
///     .bind(true);
/// assert_eq!(qx.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Queryx {
    /// Statement text.
    pub query: Query,
    /// Positional parameters in placeholder order.
    pub params: Vec<Value>,
}

impl Queryx {
    /// Creates a query without parameters.
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }

    /// Creates a query with the given parameters.
    pub fn with_params(query: impl Into<Query>, params: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Appends a positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

impl From<Query> for Queryx {
    fn from(query: Query) -> Self {
        Self::new(query)
    }
}

/// Rewrites query text and parameters before a select runs.
///
/// Closures of the shape `Fn(String, Vec<Value>) -> (String, Vec<Value>)`
/// are options too.
pub trait SelectOption {
    /// Returns the rewritten query text and parameters.
    fn wrap(&self, query: String, params: Vec<Value>) -> (String, Vec<Value>);
}

impl<F> SelectOption for F
where
    F: Fn(String, Vec<Value>) -> (String, Vec<Value>),
{
    fn wrap(&self, query: String, params: Vec<Value>) -> (String, Vec<Value>) {
        self(query, params)
    }
}

/// Applies options left to right and returns the final query.
pub fn apply_options(qx: &Queryx, options: &[&dyn SelectOption]) -> Queryx {
    let mut query = qx.query.as_str().to_string();
    let mut params = qx.params.clone();

    for option in options {
        (query, params) = option.wrap(query, params);
    }

    Queryx::with_params(query, params)
}

/// Caps the number of rows: `<query> LIMIT ?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub i64);

impl SelectOption for Limit {
    fn wrap(&self, query: String, mut params: Vec<Value>) -> (String, Vec<Value>) {
        params.push(Value::Integer(self.0));
        (format!("{query} LIMIT ?"), params)
    }
}

/// Selects one page of rows: `<query> LIMIT ? OFFSET ?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
    /// Page size.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

impl SelectOption for Paginate {
    fn wrap(&self, query: String, mut params: Vec<Value>) -> (String, Vec<Value>) {
        params.push(Value::Integer(self.limit));
        params.push(Value::Integer(self.offset));
        (format!("{query} LIMIT ? OFFSET ?"), params)
    }
}

/// Filters the rows of the wrapped query:
/// `SELECT * FROM (<query>) f WHERE <condition>`.
///
/// The condition's own parameters are appended after the query's.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// SQL boolean expression over the wrapped query's columns.
    pub condition: String,
    /// Parameters referenced by the condition.
    pub params: Vec<Value>,
}

impl Filter {
    /// Creates a filter without parameters.
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter referenced by the condition.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

impl SelectOption for Filter {
    fn wrap(&self, query: String, mut params: Vec<Value>) -> (String, Vec<Value>) {
        params.extend(self.params.iter().cloned());
        (
            format!("SELECT * FROM ({query}) f WHERE {}", self.condition),
            params,
        )
    }
}

/// Orders the rows of the wrapped query:
/// `SELECT * FROM (<query>) o ORDER BY <column> ASC|DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column of the wrapped query to sort on.
    pub column: String,
    /// Sort descending instead of ascending.
    pub descending: bool,
}

impl OrderBy {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

impl SelectOption for OrderBy {
    fn wrap(&self, query: String, params: Vec<Value>) -> (String, Vec<Value>) {
        let direction = if self.descending { "DESC" } else { "ASC" };
        (
            format!(
                "SELECT * FROM ({query}) o ORDER BY {} {direction}",
                self.column
            ),
            params,
        )
    }
}

/// Builder for a single-table select.
///
/// Fields and conditions are raw SQL expressions; generated code passes its
/// fully-qualified column constants.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::{Queryx, SelectQuery};
///
/// let qx: Queryx = SelectQuery::new("alerts")
///     .fields(["`alerts`.`id`", "`alerts`.`title`"])
///     .where_eq("`alerts`.`id`", 3i64)
///     .order_by("`alerts`.`title`", false)
///     .into();
///
/// assert_eq!(
///     qx.query.as_str(),
///     "SELECT `alerts`.`id`, `alerts`.`title` FROM alerts \
///      WHERE `alerts`.`id` = ? ORDER BY `alerts`.`title` ASC"
/// );
/// assert_eq!(qx.params.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    fields: Vec<String>,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Vec<String>,
}

impl SelectQuery {
    /// Starts a select over `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Appends selected fields. Without fields the select returns `*`.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds `<field> = ?` to the `WHERE` clause.
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(format!("{field} = ?"));
        self.params.push(value.into());
        self
    }

    /// Adds a raw condition with its parameters to the `WHERE` clause.
    ///
    /// With more than one condition each is wrapped in parentheses before
    /// they are joined with `AND`.
    pub fn filter(mut self, condition: impl Into<String>, params: Vec<Value>) -> Self {
        self.conditions.push(condition.into());
        self.params.extend(params);
        self
    }

    /// Appends an `ORDER BY` term.
    pub fn order_by(mut self, field: &str, descending: bool) -> Self {
        let direction = if descending { "DESC" } else { "ASC" };
        self.order_by.push(format!("{field} {direction}"));
        self
    }

    /// Builds the query text and parameters.
    pub fn build(self) -> Queryx {
        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };

        let mut text = format!("SELECT {fields} FROM {}", self.table);
        match self.conditions.as_slice() {
            [] => {}
            [condition] => {
                text.push_str(" WHERE ");
                text.push_str(condition);
            }
            conditions => {
                // Parenthesized so an OR inside a raw filter stays scoped to it.
                let joined: Vec<String> = conditions.iter().map(|c| format!("({c})")).collect();
                text.push_str(" WHERE ");
                text.push_str(&joined.join(" AND "));
            }
        }
        if !self.order_by.is_empty() {
            text.push_str(" ORDER BY ");
            text.push_str(&self.order_by.join(", "));
        }

        Queryx::with_params(text, self.params)
    }
}

impl From<SelectQuery> for Queryx {
    fn from(select: SelectQuery) -> Self {
        select.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Queryx {
        Queryx::new("SELECT id, active FROM alerts")
    }

    #[test]
    fn test_apply_options_without_options_is_identity() {
        assert_eq!(apply_options(&base(), &[]), base());
    }

    #[test]
    fn test_apply_options_left_to_right() {
        let paginate = Paginate {
            limit: 10,
            offset: 5,
        };
        let filter = Filter::new("active = ?").bind(1i64);

        let paged_first = apply_options(&base(), &[&paginate, &filter]);
        assert_eq!(
            paged_first.query.as_str(),
            "SELECT * FROM (SELECT id, active FROM alerts LIMIT ? OFFSET ?) f WHERE active = ?"
        );
        assert_eq!(
            paged_first.params,
            vec![Value::Integer(10), Value::Integer(5), Value::Integer(1)]
        );

        let filtered_first = apply_options(&base(), &[&filter, &paginate]);
        assert_eq!(
            filtered_first.query.as_str(),
            "SELECT * FROM (SELECT id, active FROM alerts) f WHERE active = ? LIMIT ? OFFSET ?"
        );
        assert_eq!(
            filtered_first.params,
            vec![Value::Integer(1), Value::Integer(10), Value::Integer(5)]
        );

        assert_ne!(paged_first, filtered_first);
    }

    #[test]
    fn test_closure_is_an_option() {
        let upper = |query: String, params: Vec<Value>| (query.to_uppercase(), params);
        let out = apply_options(&base(), &[&upper, &Limit(1)]);
        assert_eq!(out.query.as_str(), "SELECT ID, ACTIVE FROM ALERTS LIMIT ?");
        assert_eq!(out.params, vec![Value::Integer(1)]);
    }

    #[test]
    fn test_order_by_wraps_query() {
        let out = apply_options(&base(), &[&OrderBy::desc("id")]);
        assert_eq!(
            out.query.as_str(),
            "SELECT * FROM (SELECT id, active FROM alerts) o ORDER BY id DESC"
        );
    }

    #[test]
    fn test_select_query_without_fields_selects_star() {
        let qx = SelectQuery::new("alerts")
            .filter("id > ? AND id < ?", vec![Value::Integer(1), Value::Integer(9)])
            .build();
        assert_eq!(
            qx.query.as_str(),
            "SELECT * FROM alerts WHERE id > ? AND id < ?"
        );
        assert_eq!(qx.params.len(), 2);
    }

    #[test]
    fn test_select_query_scopes_or_filter() {
        let qx = SelectQuery::new("alerts")
            .where_eq("id", 1i64)
            .filter("a = ? OR b = ?", vec![Value::Integer(2), Value::Integer(3)])
            .build();
        assert_eq!(
            qx.query.as_str(),
            "SELECT * FROM alerts WHERE (id = ?) AND (a = ? OR b = ?)"
        );
        assert_eq!(
            qx.params,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn test_query_from_static_is_borrowed() {
        const Q: Query = Query::from_static("SELECT 1");
        assert_eq!(Q.to_string(), "SELECT 1");
        assert_eq!(Q, Query::new("SELECT 1"));
    }
}
