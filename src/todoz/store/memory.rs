use super::mem_backend::MemBackend;
use super::todo_store::TodoStore;

/// In-memory storage for testing and development.
/// Does NOT persist data.
pub type InMemoryStore = TodoStore<MemBackend>;

impl InMemoryStore {
    pub fn new() -> Self {
        TodoStore::with_backend(MemBackend::new())
    }

    pub fn backend(&self) -> &MemBackend {
        &self.backend
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::TodoId;
    use crate::store::DataStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub ids: Vec<TodoId>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                ids: Vec::new(),
            }
        }

        /// Burns ids until the allocator would hand out `next`.
        pub fn with_next_id(mut self, next: u64) -> Self {
            self.store
                .transaction(|table| {
                    while table.peek_next_id() < next {
                        table.next_id()?;
                    }
                    Ok(())
                })
                .unwrap();
            self
        }

        pub fn with_todos(mut self, count: usize, path: &str) -> Self {
            for i in 0..count {
                let text = format!("Todo {}", i + 1);
                let record = self.store.insert(path, &text, &[]).unwrap();
                self.ids.push(record.id);
            }
            self
        }

        pub fn with_todo(mut self, path: &str, text: &str) -> Self {
            let record = self.store.insert(path, text, &[]).unwrap();
            self.ids.push(record.id);
            self
        }

        pub fn with_tagged_todo(mut self, path: &str, text: &str, tags: &[&str]) -> Self {
            let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
            let record = self.store.insert(path, text, &tags).unwrap();
            self.ids.push(record.id);
            self
        }
    }
}
