#![warn(missing_docs)]
//! # padlink-canvas
//!
//! ## Purpose
//! Owns the signature drawing surface: geometry negotiation with the server,
//! stroke capture, local-cache recovery and export for upload.
//!
//! ## Responsibilities
//! - Run the startup protocol: offer to restore a cached snapshot or discard
//!   it and sync the canvas size with the server.
//! - Translate mouse and touch input into strokes through one coordinate
//!   mapping.
//! - Persist a snapshot after every stroke end.
//! - Export the surface as PNG and push it through the shared upload client.
//!
//! ## Data flow
//! [`CanvasSizeSource`] -> [`CanvasEngine::sync_size`] -> blank [`Surface`] ->
//! [`PointerEvent`]s -> strokes -> [`SnapshotStore::save`] on pointer-up ->
//! [`CanvasEngine::push`] -> upload.
//!
//! ## Error model
//! Size sync failures are logged and otherwise ignored: the surface keeps its
//! last known dimensions and stays usable. Cache failures are logged; codec
//! failures return [`CanvasError`].

mod engine;
mod input;
mod store;
mod surface;

use async_trait::async_trait;
use padlink_core::{CanvasSize, CoreError};
use padlink_upload::TransportError;
use thiserror::Error;

pub use engine::{CanvasEngine, CanvasPhase, SIGNATURE_PREFIX, StartupOutcome};
pub use input::{ClientPoint, DisplayRect, Point, PointerEvent, PointerInput, to_logical};
pub use store::{FileSnapshotStore, MemorySnapshotStore, SNAPSHOT_KEY};
pub use surface::{BLANK, INK, STROKE_WIDTH, Surface};

/// Source of the authoritative canvas size.
#[async_trait]
pub trait CanvasSizeSource: Send + Sync {
    /// Fetches the logical canvas size.
    async fn fetch_canvas_size(&self) -> Result<CanvasSize, SizeSyncError>;
}

/// Client-local persistence for at most one drawing snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored snapshot, if any.
    fn load(&self) -> Result<Option<String>, CacheError>;

    /// Stores `snapshot`, replacing any previous one.
    fn save(&self, snapshot: &str) -> Result<(), CacheError>;

    /// Deletes the stored snapshot; deleting nothing is not an error.
    fn remove(&self) -> Result<(), CacheError>;
}

/// User decision when a cached snapshot is found at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Delete the snapshot and sync the canvas size with the server.
    DiscardAndSync,
    /// Draw the snapshot onto the canvas at its current dimensions.
    Restore,
}

/// Asks the user what to do with a cached snapshot.
pub trait RecoveryPrompt {
    /// Returns the user's decision.
    fn choose(&self) -> RecoveryChoice;
}

impl RecoveryPrompt for RecoveryChoice {
    fn choose(&self) -> RecoveryChoice {
        *self
    }
}

/// Surface codec failures.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// PNG encoding failed.
    #[error("canvas encode failure: {0}")]
    Encode(String),
    /// Snapshot could not be decoded.
    #[error("snapshot decode failure: {0}")]
    Decode(String),
}

/// Local cache failures.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure.
    #[error("snapshot cache io failure: {0}")]
    Io(#[from] std::io::Error),
    /// In-memory store lock was poisoned.
    #[error("snapshot cache lock poisoned")]
    Poisoned,
}

/// Size sync failures.
#[derive(Debug, Error)]
pub enum SizeSyncError {
    /// Request failed.
    #[error("size request failed: {0}")]
    Transport(#[from] TransportError),
    /// Server answered with unusable geometry.
    #[error("invalid size response: {0}")]
    InvalidSize(#[from] CoreError),
}
