//! Free-form text capture feeding an [`ActionBar`].

use std::ops::Range;

use log::warn;
use padlink_core::status_text;

use crate::{ActionBar, CapabilityError};

/// Filename prefix of uploaded text payloads.
pub const TEXT_PREFIX: &str = "text";

/// Text buffer with a selection, re-arming its action bar on every change.
pub struct TextCapture {
    buffer: String,
    selection: Range<usize>,
    bar: ActionBar,
}

impl TextCapture {
    /// Creates an empty capture with a disarmed bar showing "Ready".
    pub fn new(mut bar: ActionBar) -> Self {
        bar.disarm();
        bar.status_mut().show(status_text::READY);
        Self {
            buffer: String::new(),
            selection: 0..0,
            bar,
        }
    }

    /// Replaces the buffer as typed by the user and puts the cursor at the end.
    pub fn input(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        let end = self.buffer.len();
        self.selection = end..end;
        self.rearm();
    }

    /// Sets the selection as byte offsets, clamped to the buffer and to
    /// character boundaries.
    pub fn select(&mut self, start: usize, end: usize) {
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        self.selection = self.floor_boundary(low)..self.floor_boundary(high);
    }

    /// Empties the buffer and disarms the bar.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.selection = 0..0;
        self.rearm();
    }

    /// Replaces the selection with clipboard text and moves the cursor after it.
    ///
    /// # Errors
    /// Returns the clipboard failure after showing it on the status line; the
    /// buffer is left untouched.
    pub async fn paste(&mut self) -> Result<(), CapabilityError> {
        let pasted = match self.bar.clipboard().read_text().await {
            Ok(pasted) => pasted,
            Err(error) => {
                warn!("clipboard read failed: {error}");
                let message = match &error {
                    CapabilityError::Unavailable(_) => {
                        "Clipboard API not supported or not in secure context.".to_string()
                    }
                    other => format!("Failed to read clipboard: {other}"),
                };
                self.bar.status_mut().show(message);
                return Err(error);
            }
        };

        let Range { start, end } = self.selection.clone();
        self.buffer.replace_range(start..end, &pasted);
        let cursor = start + pasted.len();
        self.selection = cursor..cursor;
        self.rearm();
        Ok(())
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current selection as byte offsets.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Action bar driven by this buffer.
    pub fn bar(&self) -> &ActionBar {
        &self.bar
    }

    /// Mutable action bar, for copy/open/push.
    pub fn bar_mut(&mut self) -> &mut ActionBar {
        &mut self.bar
    }

    fn rearm(&mut self) {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            self.bar.disarm();
        } else {
            self.bar.set_text(trimmed);
        }
    }

    fn floor_boundary(&self, index: usize) -> usize {
        let mut index = index.min(self.buffer.len());
        while !self.buffer.is_char_boundary(index) {
            index -= 1;
        }
        index
    }
}
