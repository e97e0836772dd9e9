use super::backend::StorageBackend;
use super::lock::{StoreLock, StoreLockGuard};
use super::table::TodoTable;
use crate::error::{Result, TodozError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const STORE_FILENAME: &str = "todos.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn store_file(&self) -> PathBuf {
        self.root.join(STORE_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| TodozError::store(self.root.display(), e))?;
        }
        Ok(())
    }

    fn write_synced(path: &Path, content: &str) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    }
}

impl StorageBackend for FsBackend {
    type Guard = StoreLockGuard;

    fn lock(&self) -> Result<StoreLockGuard> {
        StoreLock::acquire(&self.root).map_err(|e| TodozError::store(self.root.display(), e))
    }

    fn load_table(&self) -> Result<TodoTable> {
        let data_file = self.store_file();
        if !data_file.exists() {
            return Ok(TodoTable::default());
        }
        let content =
            fs::read_to_string(&data_file).map_err(|e| TodozError::store(data_file.display(), e))?;
        let table: TodoTable = serde_json::from_str(&content).map_err(|e| {
            TodozError::store(data_file.display(), format!("corrupt store file: {}", e))
        })?;
        table.validated()
    }

    fn save_table(&self, table: &TodoTable) -> Result<()> {
        self.ensure_dir()?;

        let data_file = self.store_file();
        let content = serde_json::to_string_pretty(table).map_err(TodozError::Serialization)?;

        // Atomic write: a crash leaves either the old or the new table on disk.
        let tmp_file = self.root.join(format!(".todos-{}.tmp", Uuid::new_v4()));
        if let Err(e) = Self::write_synced(&tmp_file, &content) {
            let _ = fs::remove_file(&tmp_file);
            return Err(TodozError::store(tmp_file.display(), e));
        }
        if let Err(e) = fs::rename(&tmp_file, &data_file) {
            if let Err(cleanup) = fs::remove_file(&tmp_file) {
                warn!(path = %tmp_file.display(), %cleanup, "could not remove temporary store file");
            }
            return Err(TodozError::store(data_file.display(), e));
        }
        debug!(path = %data_file.display(), records = table.len(), "saved store");
        Ok(())
    }

    fn location(&self) -> String {
        self.store_file().display().to_string()
    }
}
