//! # Storage Layer
//!
//! This module defines the record store behind todoz. The [`DataStore`] trait
//! allows the application to work with different storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Keep the line-level logic **decoupled** from persistence details
//!
//! ## Transactions
//!
//! Every mutation goes through [`DataStore::transaction`]:
//!
//! 1. Take the store-wide exclusive lock (`todos.lock`, via `fs2`).
//! 2. Load the whole [`TodoTable`] (records + id counter).
//! 3. Run the closure against the in-memory table.
//! 4. If the closure succeeded and changed something, write the table back
//!    atomically (temp file + rename). If it failed, nothing is written.
//!
//! Because the id counter lives in the same file as the records, allocating an id
//! and creating its record are committed together. A whole-document pass uses a
//! single transaction, so either all of its tags and deletions land or none do.
//!
//! Reads (`get`, `get_all`, `find`) load the last committed table without
//! locking; the atomic rename guarantees they never see a half-written file.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `TodoStore<FsBackend>`, production storage.
//! - [`memory::InMemoryStore`]: `TodoStore<MemBackend>`, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <home>/
//! ├── todos.json     # {"next_id": N, "records": [...]}
//! ├── todos.lock     # advisory lock file
//! └── config.json    # configuration
//! ```

use crate::error::Result;
use crate::model::{TodoId, TodoRecord};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod lock;
pub mod mem_backend;
pub mod memory;
pub mod table;
pub mod todo_store;

pub use table::TodoTable;

/// Abstract interface for todo record storage.
pub trait DataStore {
    /// Run `f` against the current table under the store lock and persist the
    /// result atomically if `f` succeeds. Errors roll everything back.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TodoTable) -> Result<T>;

    /// The last committed table.
    fn snapshot(&self) -> Result<TodoTable>;

    /// Reserve an id without creating a record. The id is retired for good.
    fn next_id(&mut self) -> Result<TodoId> {
        self.transaction(|table| table.next_id())
    }

    /// Always creates a new record.
    fn insert(&mut self, path: &str, text: &str, tags: &[String]) -> Result<TodoRecord> {
        self.transaction(|table| table.insert(path, text, tags))
    }

    /// Reuse the oldest record with the same `(path, text)`, or create one.
    fn create_or_update(&mut self, path: &str, text: &str, tags: &[String]) -> Result<TodoId> {
        self.transaction(|table| table.create_or_update(path, text, tags))
    }

    /// Fails with `NotFound` if the record does not exist.
    fn update(&mut self, id: TodoId, text: &str, tags: &[String]) -> Result<()> {
        self.transaction(|table| table.update(id, text, tags).map(|_| ()))
    }

    /// Idempotent; returns whether a record was removed.
    fn delete(&mut self, id: TodoId) -> Result<bool> {
        self.transaction(|table| Ok(table.delete(id)))
    }

    fn get(&self, id: TodoId) -> Result<Option<TodoRecord>> {
        Ok(self.snapshot()?.get(id).cloned())
    }

    /// All records ordered by path, then creation time.
    fn get_all(&self) -> Result<Vec<TodoRecord>> {
        Ok(self.snapshot()?.all())
    }

    fn find(&self, path: &str, text: &str) -> Result<Vec<TodoRecord>> {
        Ok(self
            .snapshot()?
            .find(path, text)
            .into_iter()
            .cloned()
            .collect())
    }

    fn search(&self, query: &str) -> Result<Vec<TodoRecord>> {
        Ok(self.snapshot()?.search(query))
    }
}
