use super::table::TodoTable;
use crate::error::Result;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while TodoStore handles the "what" (transactions, record operations).
pub trait StorageBackend {
    /// Held for the duration of one transaction; dropping it releases the lock.
    type Guard;

    /// Take the store-wide exclusive lock.
    fn lock(&self) -> Result<Self::Guard>;

    /// Load the full table. A missing store is an empty table.
    fn load_table(&self) -> Result<TodoTable>;

    /// Persist the full table.
    /// MUST be atomic (e.g. write to tmp then rename) so readers never see a partial table.
    fn save_table(&self, table: &TodoTable) -> Result<()>;

    /// Human readable location, used in diagnostics.
    fn location(&self) -> String;
}
