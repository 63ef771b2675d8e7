//! Shared fixtures for file browser tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use padlink_core::RemoteFile;
use padlink_files::{FileIndex, FilesError};
use padlink_upload::TransportError;

/// In-memory server holding named files.
#[derive(Default)]
pub struct StaticIndex {
    pub listing: Vec<RemoteFile>,
    pub contents: HashMap<String, Vec<u8>>,
    pub list_fails: AtomicBool,
    pub downloads: Mutex<Vec<String>>,
}

impl StaticIndex {
    pub fn with_files(files: &[(&str, &str, &[u8])]) -> Self {
        let mut index = Self::default();
        for (position, (name, ext, bytes)) in files.iter().enumerate() {
            index.listing.push(RemoteFile {
                name: (*name).to_string(),
                ext: (*ext).to_string(),
                size: bytes.len() as u64,
                mtime: 1_700_000_000.0 + position as f64,
            });
            index
                .contents
                .insert(format!("{name}{ext}"), bytes.to_vec());
        }
        index
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().expect("download lock").clone()
    }
}

#[async_trait]
impl FileIndex for StaticIndex {
    async fn list_files(&self) -> Result<Vec<RemoteFile>, FilesError> {
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(FilesError::Transport(TransportError::Network(
                "connection reset".to_string(),
            )));
        }
        Ok(self.listing.clone())
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, FilesError> {
        self.downloads
            .lock()
            .expect("download lock")
            .push(filename.to_string());
        self.contents
            .get(filename)
            .cloned()
            .ok_or(FilesError::Transport(TransportError::Status(404)))
    }
}
