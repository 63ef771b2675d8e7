//! Snapshot stores backing the drawing page's local cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{CacheError, SnapshotStore};

/// Cache key of the drawing page's snapshot.
pub const SNAPSHOT_KEY: &str = "sigCache";

/// Snapshot kept in one file named after [`SNAPSHOT_KEY`] inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Store rooted at `cache_dir`; the directory is created on first save.
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(SNAPSHOT_KEY),
        }
    }

    /// File holding the snapshot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(snapshot) if snapshot.is_empty() => Ok(None),
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(CacheError::Io(error)),
        }
    }

    fn save(&self, snapshot: &str) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename keeps a crash from leaving a half-written snapshot.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, snapshot)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CacheError::Io(error)),
        }
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    /// Store pre-filled with `snapshot`.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        self.snapshot
            .lock()
            .map(|snapshot| snapshot.clone())
            .map_err(|_| CacheError::Poisoned)
    }

    fn save(&self, snapshot: &str) -> Result<(), CacheError> {
        let mut slot = self.snapshot.lock().map_err(|_| CacheError::Poisoned)?;
        *slot = Some(snapshot.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        let mut slot = self.snapshot.lock().map_err(|_| CacheError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}
