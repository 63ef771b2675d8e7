#![warn(missing_docs)]
//! # padlink-scan
//!
//! ## Purpose
//! Runs QR scan sessions: camera start, first decode, self-stop and arming of
//! the shared action bar.
//!
//! ## Responsibilities
//! - Define the session states and a pure `(state, event) -> (state, effects)`
//!   transition function.
//! - Execute effects against a [`DecodeCamera`] and an
//!   [`padlink_ui::ActionBar`], feeding results back as events.
//! - Stop decoding through a cancellation token on manual stop or detection.
//!
//! ## Data flow
//! [`ScanEngine::toggle`] -> [`transition`] -> [`ScanEffect::StartCamera`] ->
//! decode channel -> [`ScanEvent::Decoded`] -> [`ScanEffect::Arm`] +
//! [`ScanEffect::StopCamera`].
//!
//! ## Ownership and lifetimes
//! The engine is the only owner of session state. Events are applied one at a
//! time; effects queue up and run in order on [`ScanEngine::settle`].
//!
//! ## Error model
//! Camera failures become [`CameraError`] and are shown on the status line;
//! the session returns to idle and can be retried with another toggle.

mod engine;
mod machine;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use engine::{SCAN_PREFIX, ScanEngine};
pub use machine::{ScanEffect, ScanEvent, ScanState, scan_text, transition};

/// Preferred camera direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Rear camera.
    #[default]
    Environment,
    /// Front camera.
    User,
}

/// Fixed configuration handed to the camera on start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Preferred camera.
    pub facing: Facing,
    /// Decode attempts per second.
    pub fps: u32,
    /// Side of the square detection region in pixels.
    pub region_size: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            fps: 10,
            region_size: 250,
        }
    }
}

/// One decode attempt reported by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeAttempt {
    /// A code was recognized.
    Decoded(String),
    /// The frame held no readable code.
    Miss,
}

/// Camera capability producing decode attempts.
#[async_trait]
pub trait DecodeCamera: Send + Sync {
    /// Acquires the camera and starts decoding.
    ///
    /// Attempts arrive on the returned channel until `cancel` fires or the
    /// camera runs dry, at which point the sender is dropped.
    async fn start(
        &self,
        config: &ScanConfig,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<DecodeAttempt>, CameraError>;

    /// Releases the camera.
    async fn stop(&self) -> Result<(), CameraError>;
}

/// Camera failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// Permission refused.
    #[error("NotAllowedError: {0}")]
    Denied(String),
    /// No usable camera.
    #[error("NotFoundError: {0}")]
    Unavailable(String),
    /// Device failure while starting or stopping.
    #[error("{0}")]
    Failed(String),
}
