//! Capability traits and the typed handler registry.
//!
//! A persisted type opts into dispatch by implementing any of the
//! single-method capability traits ([`Getter`], [`Inserter`], [`Updater`],
//! [`InsertOrUpdater`], [`Deleter`], [`Selecter`]) and registering the
//! matching [`Handlers`] in a [`Registry`] at startup. The transaction looks
//! the type up at call time; an operation without a handler fails with the
//! capability-specific error.
//!
//! # Example
//!
//! ```
//! use txkit_sqlite::rusqlite::named_params;
//! use txkit_sqlite::{Handlers, Inserter, Query, Registry, Result, Tx};
//!
//! struct Note {
//!     body: String,
//! }
//!
//! impl Inserter for Note {
//!     fn insert(&mut self, tx: &mut Tx<'_>) -> Result<()> {
//!         tx.exec_named(
//!             &Query::from_static("INSERT INTO notes (body) VALUES (:body)"),
//!             named_params! { ":body": self.body },
//!         )?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register(Handlers::<Note>::new().inserter());
//!
//! let handlers = registry.handlers::<Note>().unwrap();
//! assert!(handlers.insert.is_some());
//! assert!(handlers.get.is_none());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use rusqlite::types::Value;

use crate::error::Result;
use crate::query::{Query, Queryx};
use crate::tx::Tx;

/// Loads an object from the row selected by a query.
pub trait Getter {
    /// Replaces `self` with the row selected by `qx`.
    fn get(&mut self, tx: &mut Tx<'_>, qx: &Queryx) -> Result<()>;
}

/// Inserts an object.
pub trait Inserter {
    /// Inserts `self`, stamping creation columns first.
    fn insert(&mut self, tx: &mut Tx<'_>) -> Result<()>;
}

/// Updates an object by key.
pub trait Updater {
    /// Updates the row matching `self`'s key.
    fn update(&mut self, tx: &mut Tx<'_>) -> Result<()>;
}

/// Inserts an object or overwrites the row with the same key.
pub trait InsertOrUpdater {
    /// Upserts `self`.
    fn insert_or_update(&mut self, tx: &mut Tx<'_>) -> Result<()>;
}

/// Deletes an object by key.
pub trait Deleter {
    /// Deletes the row matching `self`'s key.
    fn delete(&self, tx: &mut Tx<'_>) -> Result<()>;
}

/// Loads many objects for a query, replacing the generic row mapping.
pub trait Selecter: Sized {
    /// Appends the rows selected by `query` and `params` to `out`.
    fn select(
        out: &mut Vec<Self>,
        tx: &mut Tx<'_>,
        query: &Query,
        params: &[Value],
    ) -> Result<()>;
}

/// Handler for [`Tx::get`].
pub type GetFn<T> = fn(&mut T, &mut Tx<'_>, &Queryx) -> Result<()>;
/// Handler for [`Tx::insert`], [`Tx::update`] and [`Tx::insert_or_update`].
pub type WriteFn<T> = fn(&mut T, &mut Tx<'_>) -> Result<()>;
/// Handler for [`Tx::delete`].
pub type DeleteFn<T> = fn(&T, &mut Tx<'_>) -> Result<()>;
/// Handler for [`Tx::select`].
pub type SelectFn<T> = fn(&mut Vec<T>, &mut Tx<'_>, &Query, &[Value]) -> Result<()>;

/// Optional persistence handlers for one type.
///
/// Build with [`Handlers::new`] and the capability methods, or fill the
/// fields directly with free functions.
pub struct Handlers<T> {
    /// Single-row load.
    pub get: Option<GetFn<T>>,
    /// Insert.
    pub insert: Option<WriteFn<T>>,
    /// Update by key.
    pub update: Option<WriteFn<T>>,
    /// Upsert.
    pub insert_or_update: Option<WriteFn<T>>,
    /// Delete by key.
    pub delete: Option<DeleteFn<T>>,
    /// Bulk select.
    pub select: Option<SelectFn<T>>,
}

impl<T> Handlers<T> {
    /// Creates an entry with no handlers.
    pub fn new() -> Self {
        Self {
            get: None,
            insert: None,
            update: None,
            insert_or_update: None,
            delete: None,
            select: None,
        }
    }

    /// Uses `T`'s [`Getter`] impl.
    pub fn getter(mut self) -> Self
    where
        T: Getter,
    {
        self.get = Some(<T as Getter>::get as GetFn<T>);
        self
    }

    /// Uses `T`'s [`Inserter`] impl.
    pub fn inserter(mut self) -> Self
    where
        T: Inserter,
    {
        self.insert = Some(<T as Inserter>::insert as WriteFn<T>);
        self
    }

    /// Uses `T`'s [`Updater`] impl.
    pub fn updater(mut self) -> Self
    where
        T: Updater,
    {
        self.update = Some(<T as Updater>::update as WriteFn<T>);
        self
    }

    /// Uses `T`'s [`InsertOrUpdater`] impl.
    pub fn insert_or_updater(mut self) -> Self
    where
        T: InsertOrUpdater,
    {
        self.insert_or_update = Some(<T as InsertOrUpdater>::insert_or_update as WriteFn<T>);
        self
    }

    /// Uses `T`'s [`Deleter`] impl.
    pub fn deleter(mut self) -> Self
    where
        T: Deleter,
    {
        self.delete = Some(<T as Deleter>::delete as DeleteFn<T>);
        self
    }

    /// Uses `T`'s [`Selecter`] impl.
    pub fn selecter(mut self) -> Self
    where
        T: Selecter,
    {
        self.select = Some(<T as Selecter>::select as SelectFn<T>);
        self
    }

    /// Every single-row capability: get, insert, update, upsert and delete.
    pub fn crud() -> Self
    where
        T: Getter + Inserter + Updater + InsertOrUpdater + Deleter,
    {
        Self::new()
            .getter()
            .inserter()
            .updater()
            .insert_or_updater()
            .deleter()
    }
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Handlers<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handlers<T> {}

impl<T> fmt::Debug for Handlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("get", &self.get.is_some())
            .field("insert", &self.insert.is_some())
            .field("update", &self.update.is_some())
            .field("insert_or_update", &self.insert_or_update.is_some())
            .field("delete", &self.delete.is_some())
            .field("select", &self.select.is_some())
            .finish()
    }
}

/// Handlers for every registered type, keyed by [`TypeId`].
///
/// Populated once at startup and shared read-only by every transaction of
/// a [`Database`](crate::Database).
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`'s handlers, replacing any previous entry for `T`.
    pub fn register<T: 'static>(&mut self, handlers: Handlers<T>) -> &mut Self {
        self.entries.insert(TypeId::of::<T>(), Box::new(handlers));
        self
    }

    /// Returns `T`'s handlers, if registered.
    pub fn handlers<T: 'static>(&self) -> Option<&Handlers<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Handlers<T>>())
    }

    /// Returns `true` if `T` has an entry.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    struct Other;

    fn no_op_insert(_: &mut Plain, _: &mut Tx<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_registry_is_keyed_by_type() {
        let mut registry = Registry::new();
        let mut handlers = Handlers::<Plain>::new();
        handlers.insert = Some(no_op_insert);
        registry.register(handlers);

        assert!(registry.contains::<Plain>());
        assert!(!registry.contains::<Other>());
        assert!(registry.handlers::<Other>().is_none());
        assert!(registry.handlers::<Plain>().unwrap().insert.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_replaces_entry() {
        let mut registry = Registry::new();
        let mut handlers = Handlers::<Plain>::new();
        handlers.insert = Some(no_op_insert);
        registry.register(handlers);
        registry.register(Handlers::<Plain>::new());

        assert_eq!(registry.len(), 1);
        assert!(registry.handlers::<Plain>().unwrap().insert.is_none());
    }

    #[test]
    fn test_handlers_debug_shows_presence() {
        let handlers = Handlers::<Plain>::default();
        assert_eq!(
            format!("{handlers:?}"),
            "Handlers { get: false, insert: false, update: false, \
             insert_or_update: false, delete: false, select: false }"
        );
    }
}
