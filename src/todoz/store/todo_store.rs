use super::backend::StorageBackend;
use super::table::TodoTable;
use super::DataStore;
use crate::error::Result;
use tracing::debug;

pub struct TodoStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> TodoStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: StorageBackend> DataStore for TodoStore<B> {
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TodoTable) -> Result<T>,
    {
        // Lock first, then load: the table we mutate is the latest one on disk.
        let _guard = self.backend.lock()?;
        let mut table = self.backend.load_table()?;

        // On error the mutated table is simply dropped; nothing reaches the backend.
        let out = f(&mut table)?;

        if table.is_dirty() {
            self.backend.save_table(&table)?;
            debug!(location = %self.backend.location(), "committed transaction");
        }
        Ok(out)
    }

    fn snapshot(&self) -> Result<TodoTable> {
        self.backend.load_table()
    }
}
