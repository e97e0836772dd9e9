use super::fs_backend::FsBackend;
use super::todo_store::TodoStore;
use std::path::PathBuf;

/// Production store: `todos.json` plus `todos.lock` inside one directory.
pub type FileStore = TodoStore<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        TodoStore::with_backend(FsBackend::new(root))
    }

    pub fn store_file(&self) -> PathBuf {
        self.backend.store_file()
    }
}
