#![warn(missing_docs)]
//! # padlink-ui
//!
//! ## Purpose
//! Models the interactive controls of the text, scan and photo capture modes.
//!
//! ## Responsibilities
//! - [`ActionBar`]: push/copy/open controls driven by the current payload.
//! - [`TextCapture`]: text buffer that re-arms the action bar on every change.
//! - [`PhotoSelection`]: multi-file selection sent as one upload request.
//! - Capability ports for the clipboard and for opening URLs.
//!
//! ## Data flow
//! Capture source -> [`ActionBar::set_payload`] -> [`ActionBar::buttons`] for
//! rendering -> user action -> clipboard / opener / upload client -> status
//! line.
//!
//! ## Ownership and lifetimes
//! Each control owns its [`padlink_core::StatusLine`]; capabilities are shared
//! `Arc` handles so several modes can use the same OS clipboard.
//!
//! ## Error model
//! Nothing in this crate is fatal. Capability failures are returned as
//! [`CapabilityError`] and projected onto the status line.

mod action_bar;
mod photos;
mod text;

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

pub use action_bar::{ActionBar, ActionButtons};
pub use photos::{PhotoSelection, SelectedPhoto, photo_status};
pub use text::{TEXT_PREFIX, TextCapture};

/// System clipboard capability.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Writes text to the clipboard.
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError>;

    /// Reads text from the clipboard.
    async fn read_text(&self) -> Result<String, CapabilityError>;
}

/// Capability that opens a URL in a new browsing context.
pub trait UrlOpener: Send + Sync {
    /// Opens `url`.
    fn open(&self, url: &str) -> Result<(), CapabilityError>;
}

/// In-process clipboard used when no OS clipboard is reachable.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<String>,
}

impl MemoryClipboard {
    /// Creates a clipboard pre-filled with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(contents.into()),
        }
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| CapabilityError::Failed("clipboard lock poisoned".to_string()))?;
        *contents = text.to_string();
        Ok(())
    }

    async fn read_text(&self) -> Result<String, CapabilityError> {
        self.contents
            .lock()
            .map(|contents| contents.clone())
            .map_err(|_| CapabilityError::Failed("clipboard lock poisoned".to_string()))
    }
}

/// Failures reported by OS capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// User or platform refused permission.
    #[error("permission denied: {0}")]
    Denied(String),
    /// Capability does not exist in this context.
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    /// Capability exists but the call failed.
    #[error("capability failure: {0}")]
    Failed(String),
}
