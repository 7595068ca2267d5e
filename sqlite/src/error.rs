//! Error types for transaction operations.
//!
//! Driver failures pass through verbatim; the remaining variants report a
//! missing capability handler or an unusable configuration.

use thiserror::Error;

/// Errors that can occur while using a [`Tx`](crate::Tx) or opening a
/// [`Database`](crate::Database).
#[derive(Debug, Error)]
pub enum TxError {
    /// SQLite prepare, exec or scan failure, reported as the driver
    /// formatted it.
    #[error(transparent)]
    DatabaseError(#[from] rusqlite::Error),

    /// Another transaction is still open on the connection.
    #[error("a transaction is already open on this connection")]
    TransactionActive,

    /// The object's type has no registered getter.
    #[error("no getter found")]
    NoGetterFound,

    /// The object's type has no registered inserter.
    #[error("no inserter found")]
    NoInserterFound,

    /// The object's type has no registered updater.
    #[error("no updater found")]
    NoUpdaterFound,

    /// The object's type has no registered insert-or-updater.
    #[error("no insert-or-updater found")]
    NoInsertOrUpdaterFound,

    /// The object's type has no registered deleter.
    #[error("no deleter found")]
    NoDeleterFound,

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`TxError`].
pub type Result<T> = std::result::Result<T, TxError>;
