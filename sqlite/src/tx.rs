//! The statement-caching transaction wrapper.
//!
//! A [`Tx`] decorates a `rusqlite` transaction with:
//!
//! - a [`StatementCache`] so identical statement text is prepared once per
//!   transaction,
//! - the ordered log of executed statement texts and elapsed-time logging on
//!   commit/rollback, with a warning for slow commits,
//! - capability dispatch ([`get`](Tx::get), [`insert`](Tx::insert), ...)
//!   through the database's [`Registry`].
//!
//! [`commit`](Tx::commit) and [`rollback`](Tx::rollback) consume the
//! transaction, so it cannot be finished twice or used afterwards. Dropping
//! an unfinished `Tx` rolls it back.
//!
//! # Example
//!
//! ```
//! use txkit_sqlite::{Database, Queryx, TxOptions};
//!
//! let db = Database::open_in_memory().unwrap();
//! db.connection()
//!     .execute_batch("CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)")
//!     .unwrap();
//!
//! let mut tx = db.begin(TxOptions::default()).unwrap();
//! let insert = "INSERT INTO kv (k, v) VALUES (?, ?)";
//! tx.exec(&Queryx::new(insert).bind("a".to_string()).bind("1".to_string())).unwrap();
//! tx.exec(&Queryx::new(insert).bind("b".to_string()).bind("2".to_string())).unwrap();
//!
//! assert_eq!(tx.cached_statements(), 1);
//! assert_eq!(tx.count(&Queryx::new("SELECT k FROM kv")).unwrap(), 2);
//! tx.commit().unwrap();
//! ```

use std::any::type_name;
use std::time::{Duration, Instant};

use rusqlite::{Connection, Params, Statement, Transaction, TransactionBehavior, params_from_iter};
use tracing::{Span, debug, error, info, warn};

use crate::cache::StatementCache;
use crate::error::{Result, TxError};
use crate::query::{Query, Queryx, SelectOption, apply_options};
use crate::registry::Registry;
use crate::row::FromRow;

/// Default threshold above which a commit is reported as slow.
pub const DEFAULT_SLOW_COMMIT: Duration = Duration::from_secs(1);

/// Locking behaviour of `BEGIN`.
///
/// See <https://www.sqlite.org/lang_transaction.html>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxBehavior {
    /// Locks are taken on first read/write (the default).
    #[default]
    Deferred,
    /// A write lock is taken immediately.
    Immediate,
    /// An exclusive lock is taken immediately.
    Exclusive,
}

impl From<TxBehavior> for TransactionBehavior {
    fn from(behavior: TxBehavior) -> Self {
        match behavior {
            TxBehavior::Deferred => Self::Deferred,
            TxBehavior::Immediate => Self::Immediate,
            TxBehavior::Exclusive => Self::Exclusive,
        }
    }
}

/// Options applied when a transaction begins.
///
/// # Examples
///
/// ```
/// use txkit_sqlite::{TxBehavior, TxOptions};
///
/// let opts = TxOptions::read_only();
/// assert!(opts.read_only);
///
/// let opts = TxOptions::default().with_behavior(TxBehavior::Immediate);
/// assert!(!opts.read_only);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOptions {
    /// Locking behaviour of `BEGIN`.
    pub behavior: TxBehavior,
    /// Reject writes for the lifetime of the transaction.
    pub read_only: bool,
}

impl TxOptions {
    /// Options for a read-only transaction.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Sets the `BEGIN` behaviour.
    pub fn with_behavior(mut self, behavior: TxBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// An open transaction with a statement cache and capability dispatch.
///
/// Created by [`Database::begin`](crate::Database::begin).
pub struct Tx<'conn> {
    conn: &'conn Connection,
    inner: Option<Transaction<'conn>>,
    registry: &'conn Registry,
    cache: StatementCache<Statement<'conn>>,
    queries: Vec<String>,
    started: Instant,
    slow_commit: Duration,
    read_only: bool,
    restore_query_only: bool,
    span: Span,
}

impl<'conn> Tx<'conn> {
    pub(crate) fn begin(
        conn: &'conn Connection,
        registry: &'conn Registry,
        options: TxOptions,
        slow_commit: Duration,
        parent: &Span,
    ) -> Result<Self> {
        let span = tracing::info_span!(
            parent: parent,
            "tx",
            behavior = ?options.behavior,
            read_only = options.read_only
        );

        if !conn.is_autocommit() {
            return Err(TxError::TransactionActive);
        }

        // Only switch query_only on if it was off, so only that change is undone.
        let restore_query_only = options.read_only
            && !conn.query_row("PRAGMA query_only;", [], |row| row.get::<_, bool>(0))?;
        if restore_query_only {
            conn.execute_batch("PRAGMA query_only = ON;")?;
        }

        let inner = match Transaction::new_unchecked(conn, options.behavior.into()) {
            Ok(inner) => inner,
            Err(err) => {
                if restore_query_only {
                    if let Err(restore) = conn.execute_batch("PRAGMA query_only = OFF;") {
                        warn!(parent: &span, error = %restore, "failed to restore write access");
                    }
                }
                return Err(err.into());
            }
        };

        debug!(parent: &span, "transaction begin");

        Ok(Self {
            conn,
            inner: Some(inner),
            registry,
            cache: StatementCache::new(),
            queries: Vec::new(),
            started: Instant::now(),
            slow_commit,
            read_only: options.read_only,
            restore_query_only,
            span,
        })
    }

    /// Returns the prepared statement for `text`, preparing it on first use.
    ///
    /// Every successful call appends `text` to [`queries`](Self::queries). A
    /// driver failure is returned unchanged and nothing is cached or logged.
    pub fn prepare(&mut self, text: &str) -> Result<&mut Statement<'conn>> {
        let conn = self.conn;
        let span = &self.span;
        let statement = self.cache.get_or_prepare(text, |text| {
            debug!(parent: span, query = text, "preparing statement");
            conn.prepare(text)
        })?;
        self.queries.push(text.to_string());
        Ok(statement)
    }

    /// Commits the transaction.
    ///
    /// Logs the elapsed time, plus a warning listing every executed query
    /// when the commit happens later than the slow-commit threshold.
    pub fn commit(mut self) -> Result<()> {
        self.cache.clear();
        let result = match self.inner.take() {
            Some(inner) => inner.commit(),
            None => Ok(()),
        };
        self.restore_writes();

        let elapsed = self.started.elapsed();
        if elapsed > self.slow_commit {
            warn!(
                parent: &self.span,
                ?elapsed,
                queries = ?self.queries,
                "transaction commit took long"
            );
        }
        info!(parent: &self.span, ?elapsed, "transaction commit");

        result.map_err(TxError::from)
    }

    /// Rolls the transaction back and logs the elapsed time.
    pub fn rollback(mut self) -> Result<()> {
        self.cache.clear();
        let result = match self.inner.take() {
            Some(inner) => inner.rollback(),
            None => Ok(()),
        };
        self.restore_writes();

        info!(parent: &self.span, elapsed = ?self.started.elapsed(), "transaction rollback");

        result.map_err(TxError::from)
    }

    /// Runs a select and collects every row into `out`.
    ///
    /// `options` rewrite the query left to right before it runs. A
    /// registered [`Selecter`](crate::Selecter) for `T` takes over with the
    /// final query; otherwise rows are mapped with [`FromRow`].
    pub fn select<T: FromRow + 'static>(
        &mut self,
        out: &mut Vec<T>,
        qx: &Queryx,
        options: &[&dyn SelectOption],
    ) -> Result<()> {
        let Queryx { query, params } = apply_options(qx, options);
        debug!(parent: &self.span, query = query.as_str(), "select");

        if let Some(select) = self.registry.handlers::<T>().and_then(|h| h.select) {
            return select(out, self, &query, &params);
        }

        let statement = self.prepare(query.as_str())?;
        let rows = statement.query_map(params_from_iter(params.iter()), T::from_row)?;
        for row in rows {
            out.push(row?);
        }
        Ok(())
    }

    /// Counts the rows `qx` returns by wrapping it as
    /// `SELECT COUNT(*) FROM (<query>) q`.
    pub fn count(&mut self, qx: &Queryx) -> Result<usize> {
        let text = format!("SELECT COUNT(*) FROM ({}) q", qx.query);
        let statement = self.prepare(&text)?;
        let count: i64 =
            statement.query_row(params_from_iter(qx.params.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Executes `qx` with its positional parameters and returns the number
    /// of changed rows.
    pub fn exec(&mut self, qx: &Queryx) -> Result<usize> {
        let statement = self.prepare(qx.query.as_str())?;
        Ok(statement.execute(params_from_iter(qx.params.iter()))?)
    }

    /// Executes `query` with named (`:name`) parameters and returns the
    /// number of changed rows.
    pub fn exec_named<P: Params>(&mut self, query: &Query, params: P) -> Result<usize> {
        let statement = self.prepare(query.as_str())?;
        Ok(statement.execute(params)?)
    }

    /// Fetches the single row selected by `qx`.
    ///
    /// Fails with [`rusqlite::Error::QueryReturnedNoRows`] when nothing
    /// matches.
    pub fn query_row<T: FromRow>(&mut self, qx: &Queryx) -> Result<T> {
        let statement = self.prepare(qx.query.as_str())?;
        Ok(statement.query_row(params_from_iter(qx.params.iter()), T::from_row)?)
    }

    /// Loads `obj` through its registered [`Getter`](crate::Getter).
    pub fn get<T: 'static>(&mut self, obj: &mut T, qx: &Queryx) -> Result<()> {
        let Some(get) = self.registry.handlers::<T>().and_then(|h| h.get) else {
            error!(parent: &self.span, object = type_name::<T>(), "no getter found for object");
            return Err(TxError::NoGetterFound);
        };
        get(obj, self, qx)
    }

    /// Inserts `obj` through its registered [`Inserter`](crate::Inserter).
    pub fn insert<T: 'static>(&mut self, obj: &mut T) -> Result<()> {
        let Some(insert) = self.registry.handlers::<T>().and_then(|h| h.insert) else {
            error!(parent: &self.span, object = type_name::<T>(), "no inserter found for object");
            return Err(TxError::NoInserterFound);
        };
        let result = insert(obj, self);
        if let Err(err) = &result {
            error!(parent: &self.span, object = type_name::<T>(), error = %err, "insert failed");
        }
        result
    }

    /// Updates `obj` through its registered [`Updater`](crate::Updater).
    pub fn update<T: 'static>(&mut self, obj: &mut T) -> Result<()> {
        let Some(update) = self.registry.handlers::<T>().and_then(|h| h.update) else {
            error!(parent: &self.span, object = type_name::<T>(), "no updater found for object");
            return Err(TxError::NoUpdaterFound);
        };
        update(obj, self)
    }

    /// Upserts `obj` through its registered
    /// [`InsertOrUpdater`](crate::InsertOrUpdater).
    pub fn insert_or_update<T: 'static>(&mut self, obj: &mut T) -> Result<()> {
        let Some(upsert) = self.registry.handlers::<T>().and_then(|h| h.insert_or_update) else {
            error!(
                parent: &self.span,
                object = type_name::<T>(),
                "no insert-or-updater found for object"
            );
            return Err(TxError::NoInsertOrUpdaterFound);
        };
        upsert(obj, self)
    }

    /// Deletes `obj` through its registered [`Deleter`](crate::Deleter).
    pub fn delete<T: 'static>(&mut self, obj: &T) -> Result<()> {
        let Some(delete) = self.registry.handlers::<T>().and_then(|h| h.delete) else {
            error!(parent: &self.span, object = type_name::<T>(), "no deleter found for object");
            return Err(TxError::NoDeleterFound);
        };
        delete(obj, self)
    }

    /// Statement texts prepared so far, in call order, repeats included.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Number of distinct statements in the cache.
    pub fn cached_statements(&self) -> usize {
        self.cache.len()
    }

    /// Time since the transaction began.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns `true` if the transaction rejects writes.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The registry used for dispatch.
    pub fn registry(&self) -> &'conn Registry {
        self.registry
    }

    /// Turns `query_only` back off after a read-only transaction ends,
    /// unless it was already on when the transaction began.
    fn restore_writes(&mut self) {
        if !self.restore_query_only {
            return;
        }
        self.restore_query_only = false;
        if let Err(err) = self.conn.execute_batch("PRAGMA query_only = OFF;") {
            warn!(parent: &self.span, error = %err, "failed to restore write access");
        }
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        self.cache.clear();
        if let Some(inner) = self.inner.take() {
            info!(
                parent: &self.span,
                elapsed = ?self.started.elapsed(),
                "transaction dropped without commit, rolling back"
            );
            drop(inner);
        }
        self.restore_writes();
    }
}
