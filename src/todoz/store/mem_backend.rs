use super::backend::StorageBackend;
use super::table::TodoTable;
use crate::error::{Result, TodozError};
use std::cell::{Cell, RefCell};

/// Keeps the last committed [`TodoTable`] in memory.
///
/// Every load hands out a fresh clone, so a transaction that fails leaves the
/// committed table as it was. Saves are counted and can be made to fail on
/// demand, which is what the command tests lean on.
#[derive(Default)]
pub struct MemBackend {
    table: RefCell<TodoTable>,
    simulate_write_error: Cell<bool>,
    saves: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every save fails with `StoreUnavailable`.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful saves, to check that no-op passes do not write.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StorageBackend for MemBackend {
    type Guard = ();

    fn lock(&self) -> Result<()> {
        Ok(())
    }

    fn load_table(&self) -> Result<TodoTable> {
        self.table.borrow().clone().validated()
    }

    fn save_table(&self, table: &TodoTable) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(TodozError::StoreUnavailable(
                "Simulated write error".to_string(),
            ));
        }
        *self.table.borrow_mut() = table.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn location(&self) -> String {
        "memory://todos".to_string()
    }
}
