//! Remote file list with checkbox selection and sequential downloads.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};
use padlink_core::{RemoteFile, StatusLine};

use crate::{DownloadSink, FileIndex, FilesError};

/// User-visible texts of the file browser.
pub mod files_status {
    /// Listing failed.
    pub const LIST_FAILED: &str = "Can not obtain file list";
    /// Download pressed with nothing checked.
    pub const NOTHING_SELECTED: &str = "Please select files to download";

    /// Summary after a download run.
    pub fn downloaded(saved: usize, failed: usize) -> String {
        if failed == 0 {
            format!("Downloaded {saved} file(s)")
        } else {
            format!("Downloaded {saved} file(s), {failed} failed")
        }
    }
}

/// Result of one [`FileBrowser::download_selected`] run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Stored files in download order.
    pub saved: Vec<PathBuf>,
    /// Files that could not be fetched or stored.
    pub failed: Vec<(String, FilesError)>,
}

/// Read-only view of the server's shared files.
pub struct FileBrowser {
    index: Arc<dyn FileIndex>,
    files: Vec<RemoteFile>,
    selected: BTreeSet<String>,
    status: StatusLine,
}

impl FileBrowser {
    /// Creates an empty browser; call [`FileBrowser::refresh`] to load rows.
    pub fn new(index: Arc<dyn FileIndex>) -> Self {
        Self {
            index,
            files: Vec::new(),
            selected: BTreeSet::new(),
            status: StatusLine::default(),
        }
    }

    /// Reloads the file list.
    ///
    /// Checked rows that disappeared from the server are unchecked. On
    /// failure the previous rows are kept.
    ///
    /// # Errors
    /// Propagates the [`FileIndex`] error after showing the status message.
    pub async fn refresh(&mut self) -> Result<&[RemoteFile], FilesError> {
        match self.index.list_files().await {
            Ok(files) => {
                info!("file list loaded count={}", files.len());
                let names: BTreeSet<String> = files.iter().map(RemoteFile::file_name).collect();
                self.selected.retain(|name| names.contains(name));
                self.files = files;
                Ok(&self.files)
            }
            Err(error) => {
                warn!("file list failed: {error}");
                self.status.show(files_status::LIST_FAILED);
                Err(error)
            }
        }
    }

    /// Current rows in server order.
    pub fn files(&self) -> &[RemoteFile] {
        &self.files
    }

    /// Checks or unchecks the row whose download name is `file_name`.
    ///
    /// Returns `false` when no such row exists.
    pub fn set_selected(&mut self, file_name: &str, checked: bool) -> bool {
        if !self.files.iter().any(|file| file.file_name() == file_name) {
            debug!("ignoring selection of unknown file {file_name:?}");
            return false;
        }
        if checked {
            self.selected.insert(file_name.to_string());
        } else {
            self.selected.remove(file_name);
        }
        true
    }

    /// Flips the check state of a row.
    pub fn toggle(&mut self, file_name: &str) -> bool {
        let checked = !self.selected.contains(file_name);
        self.set_selected(file_name, checked)
    }

    /// Checks every row.
    pub fn select_all(&mut self) {
        self.selected = self.files.iter().map(RemoteFile::file_name).collect();
    }

    /// Checked download names in row order.
    pub fn selected(&self) -> Vec<String> {
        self.files
            .iter()
            .map(RemoteFile::file_name)
            .filter(|name| self.selected.contains(name))
            .collect()
    }

    /// The download control is enabled iff the list is non-empty.
    pub fn can_download(&self) -> bool {
        !self.files.is_empty()
    }

    /// Status line of the browser.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Downloads every checked file, one request at a time, in row order.
    ///
    /// # Errors
    /// Returns [`FilesError::NothingSelected`] when no row is checked.
    /// Per-file failures are collected in the report instead.
    pub async fn download_selected(
        &mut self,
        sink: &dyn DownloadSink,
    ) -> Result<DownloadReport, FilesError> {
        let names = self.selected();
        if names.is_empty() {
            self.status.show(files_status::NOTHING_SELECTED);
            return Err(FilesError::NothingSelected);
        }

        let mut report = DownloadReport::default();
        for name in names {
            let stored = match self.index.download(&name).await {
                Ok(bytes) => sink.store(&name, &bytes),
                Err(error) => Err(error),
            };
            match stored {
                Ok(path) => {
                    info!("downloaded {name} to {}", path.display());
                    report.saved.push(path);
                }
                Err(error) => {
                    warn!("download of {name} failed: {error}");
                    report.failed.push((name, error));
                }
            }
        }

        self.status
            .show(files_status::downloaded(report.saved.len(), report.failed.len()));
        Ok(report)
    }
}
