//! Connection handle that begins [`Tx`] transactions.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::Span;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::registry::Registry;
use crate::tx::{DEFAULT_SLOW_COMMIT, Tx, TxOptions};

/// A SQLite connection with the handler registry and logging span shared by
/// its transactions.
///
/// The span is the logger handle: every transaction opens a child `tx` span
/// under it and emits its events there.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::{Database, Queryx, Registry, TxOptions};
///
/// let db = Database::open_in_memory()
///     .unwrap()
///     .with_registry(Registry::new())
///     .with_span(tracing::info_span!("orders"));
///
/// let mut tx = db.begin(TxOptions::read_only()).unwrap();
/// assert!(tx.is_read_only());
/// assert_eq!(tx.count(&Queryx::new("SELECT 1 UNION ALL SELECT 2")).unwrap(), 2);
/// tx.rollback().unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    registry: Registry,
    span: Span,
    slow_commit: Duration,
}

impl Database {
    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            registry: Registry::new(),
            span: tracing::info_span!("txkit"),
            slow_commit: DEFAULT_SLOW_COMMIT,
        }
    }

    /// Opens the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Opens the database described by `config`.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let conn = match &config.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout())?;
        if config.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }

        Ok(Self::from_connection(conn).with_slow_commit_threshold(config.slow_commit_threshold()))
    }

    /// Replaces the handler registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the parent span of every transaction.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Sets how long a transaction may stay open before its commit is
    /// reported as slow.
    pub fn with_slow_commit_threshold(mut self, threshold: Duration) -> Self {
        self.slow_commit = threshold;
        self
    }

    /// Begins a transaction.
    pub fn begin(&self, options: TxOptions) -> Result<Tx<'_>> {
        Tx::begin(
            &self.conn,
            &self.registry,
            options,
            self.slow_commit,
            &self.span,
        )
    }

    /// The handler registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the handler registry, for startup registration.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the database and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}
