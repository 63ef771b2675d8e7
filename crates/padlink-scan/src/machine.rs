//! Scan session states and the pure transition function.

/// User-visible texts of the scan mode.
pub mod scan_text {
    /// Control label while idle.
    pub const START_LABEL: &str = "Start Scan";
    /// Control label while scanning.
    pub const STOP_LABEL: &str = "Stop Scan";
    /// Status on page load and after a manual stop.
    pub const PROMPT: &str = "Click \"Start Scan\" to begin";
    /// Status while the camera starts.
    pub const STARTING: &str = "Starting camera...";
    /// Status once the camera runs.
    pub const READY: &str = "Ready to Scan";
    /// Status after a successful decode.
    pub const DETECTED: &str = "QR Detected!";

    /// Status after a camera failure.
    pub fn camera_error(error: &str) -> String {
        format!("Camera error: {error}")
    }

    /// Result display for a camera failure.
    pub fn camera_unavailable(error: &str) -> String {
        format!("Cannot access camera: {error}")
    }

    /// Result display for a decoded code.
    pub fn contents(decoded: &str) -> String {
        format!("Contents:{decoded}")
    }
}

/// Scan session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    /// No session; a toggle starts one.
    #[default]
    Idle,
    /// Camera start requested.
    Starting,
    /// Camera running, waiting for the first decode.
    Scanning,
    /// A code was decoded and the session stopped itself. Behaves like
    /// [`ScanState::Idle`] for the next toggle.
    Detected,
    /// Manual stop requested, waiting for camera release.
    Stopping,
}

/// Input to the transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// User pressed the start/stop control.
    Toggle,
    /// Camera started.
    CameraStarted,
    /// Camera could not start.
    CameraFailed(String),
    /// A code was decoded.
    Decoded(String),
    /// A frame held no code.
    DecodeMiss,
    /// Camera release finished.
    StopConfirmed,
    /// The decode stream ended without a result.
    StreamClosed,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEffect {
    /// Acquire the camera with the session configuration.
    StartCamera,
    /// Halt decoding and release the camera.
    StopCamera,
    /// Arm the action bar with decoded text.
    Arm(String),
    /// Disarm the action bar.
    Disarm,
    /// Show a status message.
    Status(String),
    /// Relabel the start/stop control.
    Label(&'static str),
    /// Replace the result display.
    ResultText(String),
}

/// Computes the next state and the effects to run.
///
/// Events that make no sense in the current state leave it unchanged with no
/// effects. A decode that arrives while a manual stop is pending still wins.
pub fn transition(state: ScanState, event: ScanEvent) -> (ScanState, Vec<ScanEffect>) {
    use ScanEffect as Fx;

    match (state, event) {
        (ScanState::Idle | ScanState::Detected, ScanEvent::Toggle) => (
            ScanState::Starting,
            vec![Fx::Status(scan_text::STARTING.to_string()), Fx::StartCamera],
        ),
        (ScanState::Starting, ScanEvent::CameraStarted) => (
            ScanState::Scanning,
            vec![
                Fx::Status(scan_text::READY.to_string()),
                Fx::Label(scan_text::STOP_LABEL),
            ],
        ),
        (ScanState::Starting, ScanEvent::CameraFailed(error)) => (
            ScanState::Idle,
            vec![
                Fx::Status(scan_text::camera_error(&error)),
                Fx::ResultText(scan_text::camera_unavailable(&error)),
                Fx::Label(scan_text::START_LABEL),
            ],
        ),
        (ScanState::Scanning, ScanEvent::Decoded(decoded)) => (
            ScanState::Detected,
            vec![
                Fx::Status(scan_text::DETECTED.to_string()),
                Fx::ResultText(scan_text::contents(&decoded)),
                Fx::Arm(decoded),
                Fx::StopCamera,
                Fx::Label(scan_text::START_LABEL),
            ],
        ),
        (ScanState::Stopping, ScanEvent::Decoded(decoded)) => (
            ScanState::Detected,
            vec![
                Fx::Status(scan_text::DETECTED.to_string()),
                Fx::ResultText(scan_text::contents(&decoded)),
                Fx::Arm(decoded),
                Fx::Label(scan_text::START_LABEL),
            ],
        ),
        (ScanState::Scanning, ScanEvent::Toggle | ScanEvent::StreamClosed) => {
            (ScanState::Stopping, vec![Fx::StopCamera])
        }
        (ScanState::Stopping, ScanEvent::StopConfirmed) => (
            ScanState::Idle,
            vec![
                Fx::Status(scan_text::PROMPT.to_string()),
                Fx::Label(scan_text::START_LABEL),
                Fx::ResultText(String::new()),
                Fx::Disarm,
            ],
        ),
        (state, _) => (state, Vec::new()),
    }
}
