//! Filesystem download destination.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::{DownloadSink, FilesError};

/// Writes downloads into one directory under their base names.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    /// Sink writing into `dir`; the directory is created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FsDownloadSink {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, FilesError> {
        let base = safe_base_name(filename)?;
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(base);
        fs::write(&target, bytes)?;
        Ok(target)
    }
}

/// Last normal path component of a server-provided name.
fn safe_base_name(filename: &str) -> Result<&str, FilesError> {
    let normalized = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match Path::new(normalized).components().next_back() {
        Some(Component::Normal(_)) if normalized != "." && normalized != ".." => Ok(normalized),
        _ => Err(FilesError::InvalidName(filename.to_string())),
    }
}
