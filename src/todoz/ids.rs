//! # Identifier Allocation
//!
//! Todo ids are plain integers handed out by a monotonic counter. The counter
//! lives in the same table as the records (see [`crate::store::TodoTable`]), so
//! it is persisted by the same atomic write: either the new record *and* the
//! bumped counter reach disk, or neither does. Ids are never handed out twice,
//! not even after the record that carried them is deleted.

use crate::error::{Result, TodozError};
use crate::model::TodoId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        // Start at 1 to leave room for hand-written "%0%" examples in docs.
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The id the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> Result<TodoId> {
        let id = self.next;
        self.next = id
            .checked_add(1)
            .ok_or(TodozError::AllocationExhausted(TodoId(id)))?;
        Ok(TodoId(id))
    }

    /// Moves the counter past `id` if it is not already ahead of it.
    pub fn observe(&mut self, id: TodoId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}
