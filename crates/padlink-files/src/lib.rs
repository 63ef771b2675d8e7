#![warn(missing_docs)]
//! # padlink-files
//!
//! ## Purpose
//! Browses the files shared by the relay server and downloads a selection of
//! them.
//!
//! ## Responsibilities
//! - Fetch and hold the remote file list through a [`FileIndex`].
//! - Track which rows are checked.
//! - Download checked files one after another into a [`DownloadSink`].
//!
//! ## Data flow
//! [`FileIndex::list_files`] -> [`FileBrowser::refresh`] -> selection ->
//! [`FileBrowser::download_selected`] -> [`FileIndex::download`] per file ->
//! [`DownloadSink::store`].
//!
//! ## Error model
//! A failed listing keeps the previous list and reports a status message. A
//! failed download is recorded in the [`DownloadReport`] and the remaining
//! files are still fetched.

mod browser;
mod sink;

use async_trait::async_trait;
use padlink_core::{CoreError, RemoteFile};
use padlink_upload::TransportError;
use thiserror::Error;

pub use browser::{DownloadReport, FileBrowser, files_status};
pub use sink::FsDownloadSink;

/// Remote file listing and retrieval.
#[async_trait]
pub trait FileIndex: Send + Sync {
    /// Fetches the shared file list in server order.
    async fn list_files(&self) -> Result<Vec<RemoteFile>, FilesError>;

    /// Fetches the raw bytes of `filename`.
    async fn download(&self, filename: &str) -> Result<Vec<u8>, FilesError>;
}

/// Destination of downloaded files.
pub trait DownloadSink: Send + Sync {
    /// Stores `bytes` under `filename` and returns where they went.
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<std::path::PathBuf, FilesError>;
}

/// File browser failures.
#[derive(Debug, Error)]
pub enum FilesError {
    /// Download requested with no file checked.
    #[error("no files selected")]
    NothingSelected,
    /// Request failed.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    /// List response or endpoint URL was invalid.
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Requested name cannot be stored safely.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
    /// Writing the download failed.
    #[error("download io failure: {0}")]
    Io(#[from] std::io::Error),
}
