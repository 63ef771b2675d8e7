//! Shared fixtures for scan session tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use padlink_scan::{CameraError, DecodeAttempt, DecodeCamera, ScanConfig, ScanEngine};
use padlink_ui::{ActionBar, CapabilityError, MemoryClipboard, UrlOpener};
use padlink_upload::{
    TransportError, TransportResponse, UploadClient, UploadPart, UploadTransport,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Camera replaying a fixed script of attempts on every start.
pub struct ScriptedCamera {
    pub script: Vec<DecodeAttempt>,
    pub failure: Option<CameraError>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub configs: Mutex<Vec<ScanConfig>>,
    sender: Mutex<Option<mpsc::Sender<DecodeAttempt>>>,
}

impl ScriptedCamera {
    pub fn replaying(script: Vec<DecodeAttempt>) -> Self {
        Self {
            script,
            failure: None,
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            configs: Mutex::new(Vec::new()),
            sender: Mutex::new(None),
        }
    }

    #[allow(dead_code)]
    pub fn failing(error: CameraError) -> Self {
        Self {
            failure: Some(error),
            ..Self::replaying(Vec::new())
        }
    }

    /// Pushes one more attempt into the running session.
    #[allow(dead_code)]
    pub fn emit(&self, attempt: DecodeAttempt) {
        let sender = self.sender.lock().expect("sender lock").clone();
        sender
            .expect("camera should be running")
            .try_send(attempt)
            .expect("channel should have room");
    }

    /// Ends the decode stream as if the camera ran dry.
    #[allow(dead_code)]
    pub fn stop_feed(&self) {
        self.sender.lock().expect("sender lock").take();
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecodeCamera for ScriptedCamera {
    async fn start(
        &self,
        config: &ScanConfig,
        _cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<DecodeAttempt>, CameraError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().expect("config lock").push(*config);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let (sender, receiver) = mpsc::channel(16);
        for attempt in &self.script {
            sender
                .try_send(attempt.clone())
                .expect("script fits the channel");
        }
        *self.sender.lock().expect("sender lock") = Some(sender);
        Ok(receiver)
    }

    async fn stop(&self) -> Result<(), CameraError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.sender.lock().expect("sender lock").take();
        Ok(())
    }
}

/// Transport answering every upload with success.
#[derive(Default)]
pub struct OkTransport {
    pub requests: Mutex<Vec<Vec<UploadPart>>>,
}

#[async_trait]
impl UploadTransport for OkTransport {
    async fn send(&self, parts: &[UploadPart]) -> Result<TransportResponse, TransportError> {
        self.requests.lock().expect("request lock").push(parts.to_vec());
        Ok(TransportResponse {
            status: 200,
            body: br#"{"success":true}"#.to_vec(),
        })
    }
}

/// Opener remembering opened URLs.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        self.opened.lock().expect("opener lock").push(url.to_string());
        Ok(())
    }
}

/// Engine plus the fakes behind it.
pub struct Harness {
    pub engine: ScanEngine,
    pub camera: Arc<ScriptedCamera>,
    pub opener: Arc<RecordingOpener>,
    pub transport: Arc<OkTransport>,
}

impl Harness {
    pub fn new(camera: ScriptedCamera) -> Self {
        let camera = Arc::new(camera);
        let opener = Arc::new(RecordingOpener::default());
        let transport = Arc::new(OkTransport::default());
        let bar = ActionBar::new(
            padlink_scan::SCAN_PREFIX,
            UploadClient::new(transport.clone()).with_clock(|| 7),
            Arc::new(MemoryClipboard::default()),
            opener.clone(),
        );
        let engine = ScanEngine::new(bar, camera.clone(), ScanConfig::default());
        Self {
            engine,
            camera,
            opener,
            transport,
        }
    }
}
