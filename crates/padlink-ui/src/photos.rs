//! Photo selection sent as one multipart request.

use log::info;
use padlink_core::{StatusLine, UploadOutcome};
use padlink_upload::{UploadClient, UploadPart};

/// Status texts specific to the photo mode.
pub mod photo_status {
    /// Shown after the server stored every selected file.
    pub const SENT: &str = "Upload successful!";
    /// Shown when the request never produced a readable answer.
    pub const RETRY: &str = "Upload failed, please try again!";
    /// Shown when sending with nothing selected.
    pub const NOTHING_SELECTED: &str = "Please select files to send";

    /// `Upload failed: <message>` for a server rejection.
    pub fn rejected(message: &str) -> String {
        let message = if message.is_empty() {
            "Unknown error"
        } else {
            message
        };
        format!("Upload failed: {message}")
    }
}

/// One file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPhoto {
    /// Original file name, kept as the upload filename.
    pub name: String,
    /// Mime type of the file.
    pub mime: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// Current multi-file selection.
pub struct PhotoSelection {
    files: Vec<SelectedPhoto>,
    status: StatusLine,
    uploader: UploadClient,
}

impl PhotoSelection {
    /// Creates an empty selection.
    pub fn new(uploader: UploadClient) -> Self {
        Self {
            files: Vec::new(),
            status: StatusLine::default(),
            uploader,
        }
    }

    /// Replaces the selection.
    pub fn select(&mut self, files: Vec<SelectedPhoto>) {
        self.files = files;
    }

    /// Selected files in pick order.
    pub fn files(&self) -> &[SelectedPhoto] {
        &self.files
    }

    /// Returns `true` when the send control should be shown.
    pub fn can_send(&self) -> bool {
        !self.files.is_empty()
    }

    /// Status line of this mode.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Sends every selected file in one request.
    ///
    /// Returns `None` without a request when nothing is selected.
    pub async fn send(&mut self) -> Option<UploadOutcome> {
        if self.files.is_empty() {
            self.status.show(photo_status::NOTHING_SELECTED);
            return None;
        }

        let parts = self
            .files
            .iter()
            .map(|file| UploadPart::new(file.name.clone(), file.mime.clone(), file.bytes.clone()))
            .collect::<Vec<_>>();
        info!("sending {} selected files", parts.len());

        let outcome = self.uploader.upload_parts(parts).await;
        let text = match &outcome {
            UploadOutcome::Saved { .. } => photo_status::SENT.to_string(),
            UploadOutcome::ServerRejected { message } => photo_status::rejected(message),
            UploadOutcome::TransportFailed { .. } => photo_status::RETRY.to_string(),
        };
        self.status.show(text);
        Some(outcome)
    }
}
