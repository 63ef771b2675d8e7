//! User-visible status line and the texts shown on it.

use log::debug;

/// Canonical status texts shared by all capture modes.
pub mod status_text {
    /// Shown synchronously when an upload starts.
    pub const UPLOADING: &str = "Uploading...";
    /// Shown when the server stored an upload.
    pub const SAVED: &str = "Saved!";
    /// Shown when an upload could not reach the server or the answer was unreadable.
    pub const UPLOAD_FAILED: &str = "Upload failed";
    /// Shown after a successful clipboard write.
    pub const COPIED: &str = "Copied to clipboard";
    /// Shown when the clipboard refused a write.
    pub const COPY_FAILED: &str = "Copy failed";
    /// Initial text mode status.
    pub const READY: &str = "Ready";
    /// Initial drawing mode status.
    pub const DRAW_PROMPT: &str = "Draw on this canvas";
    /// Shown after the drawing surface was cleared.
    pub const CANVAS_CLEARED: &str = "Clean Canvas";

    /// `Upload error: <message>` for a server rejection.
    pub fn upload_error(message: &str) -> String {
        format!("Upload error: {message}")
    }
}

/// Single-line status display owned by one capture mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    updates: u64,
}

impl StatusLine {
    /// Creates a status line showing `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
            updates: 0,
        }
    }

    /// Replaces the shown text.
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updates += 1;
        debug!("status: {}", self.text);
    }

    /// Currently shown text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of updates since creation.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
