//! Per-transaction prepared statement cache.
//!
//! Keyed by exact statement text: no normalization, no eviction, no
//! invalidation. A cache lives exactly as long as the transaction that owns
//! it, so its size is bounded by the number of distinct statements that
//! transaction issues.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Map from statement text to a prepared statement.
///
/// Generic over the statement type so the hit/miss behaviour does not
/// depend on a live connection.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::StatementCache;
///
/// let mut cache: StatementCache<String> = StatementCache::new();
/// let mut prepares = 0;
///
/// for _ in 0..3 {
///     cache
///         .get_or_prepare("SELECT 1", |text| {
///             prepares += 1;
///             Ok::<_, ()>(text.to_uppercase())
///         })
///         .unwrap();
/// }
///
/// assert_eq!(prepares, 1);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct StatementCache<S> {
    statements: HashMap<String, S>,
}

impl<S> StatementCache<S> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            statements: HashMap::new(),
        }
    }

    /// Returns the cached statement for `text`, preparing and caching it on
    /// first use.
    ///
    /// A failed prepare is returned as-is and leaves the cache untouched.
    pub fn get_or_prepare<E, F>(&mut self, text: &str, prepare: F) -> Result<&mut S, E>
    where
        F: FnOnce(&str) -> Result<S, E>,
    {
        match self.statements.entry(text.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let statement = prepare(text)?;
                Ok(entry.insert(statement))
            }
        }
    }

    /// Returns `true` if `text` has a cached statement.
    pub fn contains(&self, text: &str) -> bool {
        self.statements.contains_key(text)
    }

    /// Number of cached statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Drops every cached statement.
    pub fn clear(&mut self) {
        self.statements.clear();
    }
}

impl<S> Default for StatementCache<S> {
    fn default() -> Self {
        Self::new()
    }
}
