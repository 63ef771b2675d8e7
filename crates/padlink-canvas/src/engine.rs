//! Drawing session lifecycle: startup recovery, size sync, strokes and push.

use std::sync::Arc;

use log::{debug, info, warn};
use padlink_core::{CanvasSize, StatusLine, UploadBody, UploadOutcome, status_text};
use padlink_upload::UploadClient;

use crate::input::to_logical;
use crate::{
    CanvasSizeSource, DisplayRect, Point, PointerEvent, PointerInput, RecoveryChoice,
    RecoveryPrompt, SizeSyncError, SnapshotStore, Surface,
};

/// Filename prefix of exported drawings.
pub const SIGNATURE_PREFIX: &str = "signature";

const PNG_MIME: &str = "image/png";
const PNG_EXTENSION: &str = "png";

/// Lifecycle phase of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasPhase {
    /// Startup has not run yet.
    Uninitialized,
    /// Waiting for the server size.
    SizeSyncing,
    /// Accepting input, no stroke in progress.
    Ready,
    /// A stroke is in progress.
    Drawing,
}

/// How startup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// No snapshot was restored and the server size was applied.
    Synced(CanvasSize),
    /// No snapshot was restored and the size request failed.
    SyncFailed,
    /// The cached snapshot was drawn onto the surface.
    Restored,
    /// The cached snapshot could not be decoded; the surface stays blank.
    RestoreFailed,
}

/// Owner of one drawing session.
pub struct CanvasEngine {
    surface: Surface,
    phase: CanvasPhase,
    display: DisplayRect,
    last_point: Option<Point>,
    status: StatusLine,
    size_source: Arc<dyn CanvasSizeSource>,
    store: Arc<dyn SnapshotStore>,
    uploader: UploadClient,
}

impl CanvasEngine {
    /// Creates a blank engine at `initial` size, displayed unscaled.
    pub fn new(
        initial: CanvasSize,
        size_source: Arc<dyn CanvasSizeSource>,
        store: Arc<dyn SnapshotStore>,
        uploader: UploadClient,
    ) -> Self {
        Self {
            surface: Surface::blank(initial),
            phase: CanvasPhase::Uninitialized,
            display: DisplayRect::unscaled(initial),
            last_point: None,
            status: StatusLine::new(status_text::DRAW_PROMPT),
            size_source,
            store,
            uploader,
        }
    }

    /// Runs the startup protocol.
    ///
    /// With a cached snapshot the prompt decides between restoring it (no
    /// size request) and discarding it followed by a size sync. Without one
    /// the size is synced directly.
    pub async fn start(&mut self, prompt: &dyn RecoveryPrompt) -> StartupOutcome {
        let cached = match self.store.load() {
            Ok(cached) => cached,
            Err(error) => {
                warn!("snapshot cache unreadable, starting fresh: {error}");
                None
            }
        };

        let outcome = match cached {
            Some(snapshot) => match prompt.choose() {
                RecoveryChoice::Restore => self.restore(&snapshot),
                RecoveryChoice::DiscardAndSync => {
                    if let Err(error) = self.store.remove() {
                        warn!("failed to discard cached snapshot: {error}");
                    }
                    self.startup_sync().await
                }
            },
            None => self.startup_sync().await,
        };

        if self.phase == CanvasPhase::Uninitialized {
            self.phase = CanvasPhase::Ready;
        }
        info!("canvas started outcome={outcome:?} size={:?}", self.size());
        outcome
    }

    /// Fetches the server size and, on success, replaces the surface with a
    /// blank one of that size.
    ///
    /// On failure the surface, its size and the phase are unchanged.
    ///
    /// # Errors
    /// Returns the [`SizeSyncError`] from the size source.
    pub async fn sync_size(&mut self) -> Result<CanvasSize, SizeSyncError> {
        let previous = self.phase;
        self.phase = CanvasPhase::SizeSyncing;
        let fetched = self.size_source.fetch_canvas_size().await;
        self.phase = match previous {
            CanvasPhase::Uninitialized => CanvasPhase::Uninitialized,
            _ => CanvasPhase::Ready,
        };

        match fetched {
            Ok(size) => {
                self.surface = Surface::blank(size);
                self.display = DisplayRect::unscaled(size);
                self.last_point = None;
                debug!("canvas resized to {}x{}", size.width, size.height);
                Ok(size)
            }
            Err(error) => {
                warn!("canvas size sync failed: {error}");
                Err(error)
            }
        }
    }

    /// Clears the drawing by re-syncing the size.
    ///
    /// A failed sync leaves the surface and its size unchanged.
    pub async fn clear(&mut self) {
        if let Err(error) = self.sync_size().await {
            debug!("clear kept the current drawing: {error}");
        }
        self.phase = CanvasPhase::Ready;
        self.status.show(status_text::CANVAS_CLEARED);
    }

    /// Records where the surface is currently displayed.
    pub fn set_display(&mut self, display: DisplayRect) {
        self.display = display;
    }

    /// Applies one pointer event.
    ///
    /// Events before startup completes are ignored. Pointer-up persists a
    /// snapshot whether or not a stroke was in progress.
    pub fn handle(&mut self, event: PointerEvent) {
        match (self.phase, event) {
            (CanvasPhase::Uninitialized | CanvasPhase::SizeSyncing, event) => {
                debug!("ignoring pointer event before startup: {event:?}");
            }
            (CanvasPhase::Ready | CanvasPhase::Drawing, PointerEvent::Down(input)) => {
                self.last_point = self.locate(&input);
                self.phase = CanvasPhase::Drawing;
            }
            (CanvasPhase::Drawing, PointerEvent::Move(input)) => {
                let Some(point) = self.locate(&input) else {
                    return;
                };
                if let Some(from) = self.last_point {
                    self.surface.stroke_segment(from, point);
                }
                self.last_point = Some(point);
            }
            (CanvasPhase::Ready, PointerEvent::Move(_)) => {}
            (CanvasPhase::Ready | CanvasPhase::Drawing, PointerEvent::Up) => {
                self.phase = CanvasPhase::Ready;
                self.last_point = None;
                self.persist();
            }
        }
    }

    /// Exports the surface as PNG and uploads it.
    ///
    /// The cached snapshot is kept after upload.
    pub async fn push(&mut self) -> UploadOutcome {
        self.status.show(status_text::UPLOADING);
        let outcome = match self.surface.encode_png() {
            Ok(bytes) => {
                let body = UploadBody {
                    bytes,
                    mime: PNG_MIME.to_string(),
                    extension: PNG_EXTENSION.to_string(),
                };
                self.uploader.upload(body, SIGNATURE_PREFIX).await
            }
            Err(error) => UploadOutcome::TransportFailed {
                reason: error.to_string(),
            },
        };
        self.status.show(outcome.status_text());
        outcome
    }

    /// Current surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Current logical size.
    pub fn size(&self) -> CanvasSize {
        self.surface.size()
    }

    /// Current phase.
    pub fn phase(&self) -> CanvasPhase {
        self.phase
    }

    /// Status line shown under the canvas.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    async fn startup_sync(&mut self) -> StartupOutcome {
        match self.sync_size().await {
            Ok(size) => StartupOutcome::Synced(size),
            Err(_) => StartupOutcome::SyncFailed,
        }
    }

    fn restore(&mut self, snapshot: &str) -> StartupOutcome {
        match self.surface.draw_snapshot(snapshot) {
            Ok(()) => StartupOutcome::Restored,
            Err(error) => {
                warn!("cached snapshot could not be restored: {error}");
                StartupOutcome::RestoreFailed
            }
        }
    }

    fn locate(&self, input: &PointerInput) -> Option<Point> {
        input
            .primary()
            .and_then(|point| to_logical(point, self.display, self.surface.size()))
    }

    fn persist(&self) {
        let saved = self
            .surface
            .to_snapshot()
            .map_err(|error| error.to_string())
            .and_then(|snapshot| self.store.save(&snapshot).map_err(|error| error.to_string()));
        if let Err(error) = saved {
            warn!("failed to cache canvas snapshot: {error}");
        }
    }
}
