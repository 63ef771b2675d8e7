//! Effect dispatcher driving one scan session at a time.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, info, warn};
use padlink_ui::ActionBar;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::machine::{ScanEffect, ScanEvent, ScanState, scan_text, transition};
use crate::{DecodeAttempt, DecodeCamera, ScanConfig};

/// Filename prefix of uploaded scan results.
pub const SCAN_PREFIX: &str = "scan";

/// Scan mode controller.
///
/// Events are applied synchronously by [`ScanEngine::toggle`] and the decode
/// loop; the effects they produce run in order on [`ScanEngine::settle`].
pub struct ScanEngine {
    state: ScanState,
    label: &'static str,
    result_text: String,
    last_result: Option<String>,
    bar: ActionBar,
    camera: Arc<dyn DecodeCamera>,
    config: ScanConfig,
    pending: VecDeque<ScanEffect>,
    decodes: Option<mpsc::Receiver<DecodeAttempt>>,
    cancel: CancellationToken,
}

impl ScanEngine {
    /// Creates an idle engine around `bar`.
    pub fn new(mut bar: ActionBar, camera: Arc<dyn DecodeCamera>, config: ScanConfig) -> Self {
        bar.disarm();
        bar.status_mut().show(scan_text::PROMPT);
        Self {
            state: ScanState::Idle,
            label: scan_text::START_LABEL,
            result_text: String::new(),
            last_result: None,
            bar,
            camera,
            config,
            pending: VecDeque::new(),
            decodes: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Presses the start/stop control.
    ///
    /// Only the transition is applied here; call [`ScanEngine::settle`] to run
    /// the camera work it requested. Repeated toggles before settling collapse
    /// into one camera start.
    pub fn toggle(&mut self) {
        self.dispatch(ScanEvent::Toggle);
    }

    /// Runs queued effects until none remain.
    pub async fn settle(&mut self) {
        while let Some(effect) = self.pending.pop_front() {
            self.run(effect).await;
        }
    }

    /// Waits for the next decode attempt and applies it.
    ///
    /// Returns `false` when no session is scanning.
    pub async fn poll_decode(&mut self) -> bool {
        if self.state != ScanState::Scanning {
            return false;
        }
        let Some(decodes) = self.decodes.as_mut() else {
            return false;
        };

        let event = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            attempt = decodes.recv() => Some(match attempt {
                Some(DecodeAttempt::Decoded(text)) => ScanEvent::Decoded(text),
                Some(DecodeAttempt::Miss) => ScanEvent::DecodeMiss,
                None => ScanEvent::StreamClosed,
            }),
        };

        if let Some(event) = event {
            self.dispatch(event);
        }
        self.settle().await;
        true
    }

    /// Starts a session and waits for it to end.
    ///
    /// Returns the decoded text when the session ended with a detection.
    pub async fn scan_once(&mut self) -> Option<String> {
        if !matches!(self.state, ScanState::Idle | ScanState::Detected) {
            return None;
        }
        self.toggle();
        self.settle().await;
        while self.poll_decode().await {}

        match self.state {
            ScanState::Detected => self.last_result.clone(),
            _ => None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current start/stop control label.
    pub fn label(&self) -> &str {
        self.label
    }

    /// Current result display.
    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Last decoded text.
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Shared action bar.
    pub fn bar(&self) -> &ActionBar {
        &self.bar
    }

    /// Mutable action bar, for push/copy/open.
    pub fn bar_mut(&mut self) -> &mut ActionBar {
        &mut self.bar
    }

    fn dispatch(&mut self, event: ScanEvent) {
        let label = event_label(&event);
        let (next, effects) = transition(self.state, event);
        if next != self.state {
            info!("scan {:?} -> {:?} on {label}", self.state, next);
        } else if effects.is_empty() {
            debug!("scan ignored {label} in {:?}", self.state);
        }
        self.state = next;
        self.pending.extend(effects);
    }

    async fn run(&mut self, effect: ScanEffect) {
        match effect {
            ScanEffect::StartCamera => {
                self.cancel = CancellationToken::new();
                match self.camera.start(&self.config, self.cancel.clone()).await {
                    Ok(decodes) => {
                        self.decodes = Some(decodes);
                        self.dispatch(ScanEvent::CameraStarted);
                    }
                    Err(error) => {
                        warn!("camera start failed: {error}");
                        self.dispatch(ScanEvent::CameraFailed(error.to_string()));
                    }
                }
            }
            ScanEffect::StopCamera => self.stop_camera().await,
            ScanEffect::Arm(decoded) => {
                self.last_result = Some(decoded.clone());
                self.bar.set_text(&decoded);
            }
            ScanEffect::Disarm => self.bar.disarm(),
            ScanEffect::Status(text) => self.bar.status_mut().show(text),
            ScanEffect::Label(label) => self.label = label,
            ScanEffect::ResultText(text) => self.result_text = text,
        }
    }

    /// Decodes already buffered when the stop begins, or delivered before the
    /// camera confirms the release, are applied ahead of the confirmation.
    async fn stop_camera(&mut self) {
        self.cancel.cancel();
        self.drain_buffered();
        if let Err(error) = self.camera.stop().await {
            warn!("camera stop failed: {error}");
        }
        self.drain_buffered();
        self.decodes = None;
        self.dispatch(ScanEvent::StopConfirmed);
    }

    fn drain_buffered(&mut self) {
        let mut buffered = Vec::new();
        if let Some(decodes) = self.decodes.as_mut() {
            while let Ok(attempt) = decodes.try_recv() {
                if let DecodeAttempt::Decoded(text) = attempt {
                    buffered.push(text);
                }
            }
        }
        for text in buffered {
            self.dispatch(ScanEvent::Decoded(text));
        }
    }
}

fn event_label(event: &ScanEvent) -> &'static str {
    match event {
        ScanEvent::Toggle => "toggle",
        ScanEvent::CameraStarted => "camera-started",
        ScanEvent::CameraFailed(_) => "camera-failed",
        ScanEvent::Decoded(_) => "decoded",
        ScanEvent::DecodeMiss => "miss",
        ScanEvent::StopConfirmed => "stop-confirmed",
        ScanEvent::StreamClosed => "stream-closed",
    }
}
