//! SQLite transaction wrapper with statement caching and capability
//! dispatch.
//!
//! This crate decorates a [`rusqlite`] transaction with a per-transaction
//! prepared statement cache, commit/rollback timing logs, and dispatch of
//! generic persistence intents to type-specific handlers.
//!
//! # Architecture
//!
//! - **`query`**: [`Query`], [`Queryx`], [`SelectOption`]s and the
//!   [`SelectQuery`] builder
//! - **`cache`**: [`StatementCache`], keyed by exact statement text
//! - **`tx`**: [`Tx`], the wrapper itself
//! - **`registry`**: capability traits and the typed handler [`Registry`]
//! - **`database`**: [`Database`], which owns the connection, registry and
//!   logging span and begins transactions
//! - **`config`**: YAML [`DatabaseConfig`]
//!
//! # Quick start
//!
//! ```
//! use txkit_sqlite::rusqlite::{Row, named_params};
//! use txkit_sqlite::*;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl FromRow for User {
//!     fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
//!         Ok(Self { id: row.get("id")?, name: row.get("name")? })
//!     }
//! }
//!
//! impl Inserter for User {
//!     fn insert(&mut self, tx: &mut Tx<'_>) -> Result<()> {
//!         tx.exec_named(
//!             &Query::from_static("INSERT INTO users (id, name) VALUES (:id, :name)"),
//!             named_params! { ":id": self.id, ":name": self.name },
//!         )?;
//!         Ok(())
//!     }
//! }
//!
//! let mut db = Database::open_in_memory().unwrap();
//! db.connection()
//!     .execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")
//!     .unwrap();
//! db.registry_mut().register(Handlers::<User>::new().inserter());
//!
//! let mut tx = db.begin(TxOptions::default()).unwrap();
//! tx.insert(&mut User { id: 1, name: "ada".into() }).unwrap();
//!
//! let mut users: Vec<User> = Vec::new();
//! tx.select(&mut users, &Queryx::new("SELECT id, name FROM users"), &[]).unwrap();
//! assert_eq!(users, vec![User { id: 1, name: "ada".into() }]);
//!
//! // No getter registered for User
//! let err = tx.get(&mut User::default(), &Queryx::new("SELECT 1")).unwrap_err();
//! assert!(matches!(err, TxError::NoGetterFound));
//! tx.commit().unwrap();
//! ```

mod cache;
mod config;
mod database;
mod error;
mod query;
mod registry;
mod row;
mod tx;

pub use cache::StatementCache;
pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{Result, TxError};
pub use query::{
    Filter, Limit, OrderBy, Paginate, Query, Queryx, SelectOption, SelectQuery, apply_options,
};
pub use registry::{
    DeleteFn, Deleter, GetFn, Getter, Handlers, InsertOrUpdater, Inserter, Registry, SelectFn,
    Selecter, Updater, WriteFn,
};
pub use row::FromRow;
pub use tx::{DEFAULT_SLOW_COMMIT, Tx, TxBehavior, TxOptions};

pub use chrono;
pub use rusqlite;
