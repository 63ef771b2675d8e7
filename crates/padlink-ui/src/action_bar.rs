//! Push/copy/open controls shared by the scan and text modes.

use std::sync::Arc;

use log::{info, warn};
use padlink_core::{ActionPayload, PayloadKind, PayloadValue, StatusLine, UploadOutcome, status_text};
use padlink_upload::UploadClient;

use crate::{Clipboard, UrlOpener};

/// Enabled state of the three action controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionButtons {
    /// Upload the payload.
    pub push: bool,
    /// Copy the payload text.
    pub copy: bool,
    /// Open the payload as a URL.
    pub open: bool,
}

/// Action bar bound to one capture mode.
///
/// Button state is computed from the held payload on every call to
/// [`ActionBar::buttons`], so it can never lag behind the last
/// [`ActionBar::set_payload`].
pub struct ActionBar {
    payload: Option<ActionPayload>,
    filename_prefix: String,
    status: StatusLine,
    uploader: UploadClient,
    clipboard: Arc<dyn Clipboard>,
    opener: Arc<dyn UrlOpener>,
}

impl ActionBar {
    /// Creates a disarmed action bar.
    pub fn new(
        filename_prefix: impl Into<String>,
        uploader: UploadClient,
        clipboard: Arc<dyn Clipboard>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            payload: None,
            filename_prefix: filename_prefix.into(),
            status: StatusLine::default(),
            uploader,
            clipboard,
            opener,
        }
    }

    /// Arms the bar with `value`, or disarms it when `value` is empty.
    pub fn set_payload(&mut self, value: PayloadValue) {
        self.payload = ActionPayload::from_value(value, self.filename_prefix.as_str());
    }

    /// Arms the bar with text.
    pub fn set_text(&mut self, value: &str) {
        self.set_payload(PayloadValue::Text(value.to_string()));
    }

    /// Drops the payload and disables every action.
    pub fn disarm(&mut self) {
        self.payload = None;
    }

    /// Returns `true` while a payload is held.
    pub fn is_armed(&self) -> bool {
        self.payload.is_some()
    }

    /// Current payload, if armed.
    pub fn payload(&self) -> Option<&ActionPayload> {
        self.payload.as_ref()
    }

    /// Enabled state of the controls for the current payload.
    pub fn buttons(&self) -> ActionButtons {
        match &self.payload {
            None => ActionButtons::default(),
            Some(payload) => ActionButtons {
                push: true,
                copy: payload.text().is_some(),
                open: payload.kind() == PayloadKind::Url,
            },
        }
    }

    /// Status line of this bar.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Mutable status line, for mode-level messages.
    pub fn status_mut(&mut self) -> &mut StatusLine {
        &mut self.status
    }

    pub(crate) fn clipboard(&self) -> &Arc<dyn Clipboard> {
        &self.clipboard
    }

    /// Copies the payload text to the clipboard.
    ///
    /// Returns `false` without side effects when there is nothing to copy.
    pub async fn copy(&mut self) -> bool {
        let Some(text) = self.payload.as_ref().and_then(|payload| payload.text()) else {
            return false;
        };
        let text = text.to_string();

        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                self.status.show(status_text::COPIED);
                true
            }
            Err(error) => {
                warn!("clipboard write failed: {error}");
                self.status.show(status_text::COPY_FAILED);
                false
            }
        }
    }

    /// Opens the normalized URL of a URL payload.
    ///
    /// Returns `false` without side effects unless the payload is a URL.
    pub fn open(&mut self) -> bool {
        let Some(url) = self.payload.as_ref().and_then(ActionPayload::open_url) else {
            return false;
        };

        match self.opener.open(&url) {
            Ok(()) => {
                info!("opened {url}");
                true
            }
            Err(error) => {
                warn!("open {url} failed: {error}");
                false
            }
        }
    }

    /// Marks an upload as started and returns the payload to send.
    ///
    /// The status switches to "Uploading..." before any network activity.
    pub fn begin_push(&mut self) -> Option<ActionPayload> {
        let payload = self.payload.clone()?;
        self.status.show(status_text::UPLOADING);
        Some(payload)
    }

    /// Shows the result of an upload started with [`ActionBar::begin_push`].
    pub fn complete_push(&mut self, outcome: &UploadOutcome) {
        self.status.show(outcome.status_text());
    }

    /// Uploads the current payload and reports the result.
    ///
    /// Returns `None` when disarmed.
    pub async fn push(&mut self) -> Option<UploadOutcome> {
        let payload = self.begin_push()?;
        let outcome = self.uploader.upload_payload(&payload).await;
        self.complete_push(&outcome);
        Some(outcome)
    }
}
