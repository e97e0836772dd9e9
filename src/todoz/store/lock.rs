use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const LOCK_FILENAME: &str = "todos.lock";

/// Guard representing a held store lock. The lock is released when dropped.
pub struct StoreLockGuard {
    file: File,
    path: PathBuf,
}

impl StoreLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs2::FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), %err, "failed to release store lock");
        }
    }
}

/// Advisory, exclusive lock on a store directory. Every process that mutates the
/// store takes it, so two editors saving at once cannot hand out the same id.
pub struct StoreLock;

impl StoreLock {
    /// Blocks until the lock is available.
    pub fn acquire(store_dir: &Path) -> io::Result<StoreLockGuard> {
        let (file, path) = Self::open_lock_file(store_dir)?;
        fs2::FileExt::lock_exclusive(&file)?;
        Ok(StoreLockGuard { file, path })
    }

    /// Attempt to acquire the lock without blocking.
    pub fn try_acquire(store_dir: &Path) -> io::Result<StoreLockGuard> {
        let (file, path) = Self::open_lock_file(store_dir)?;
        fs2::FileExt::try_lock_exclusive(&file)?;
        Ok(StoreLockGuard { file, path })
    }

    fn open_lock_file(store_dir: &Path) -> io::Result<(File, PathBuf)> {
        fs::create_dir_all(store_dir)?;
        let lock_path = store_dir.join(LOCK_FILENAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        Ok((file, lock_path))
    }
}
