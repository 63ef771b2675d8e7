//! Shared fixtures for action bar and capture mode tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use padlink_ui::{ActionBar, CapabilityError, Clipboard, MemoryClipboard, UrlOpener};
use padlink_upload::{
    TransportError, TransportResponse, UploadClient, UploadPart, UploadTransport,
};

/// Transport answering every request with one canned JSON body.
pub struct CannedTransport {
    pub body: &'static str,
    pub requests: Mutex<Vec<Vec<UploadPart>>>,
}

#[async_trait]
impl UploadTransport for CannedTransport {
    async fn send(&self, parts: &[UploadPart]) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(parts.to_vec());
        Ok(TransportResponse {
            status: 200,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

/// Opener remembering every URL it was asked to open.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        self.opened
            .lock()
            .expect("opener lock should work")
            .push(url.to_string());
        Ok(())
    }
}

/// Clipboard refusing every access.
#[allow(dead_code)]
pub struct DenyingClipboard;

#[async_trait]
impl Clipboard for DenyingClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), CapabilityError> {
        Err(CapabilityError::Denied("write refused".to_string()))
    }

    async fn read_text(&self) -> Result<String, CapabilityError> {
        Err(CapabilityError::Denied("read refused".to_string()))
    }
}

/// Collaborators of one bar under test.
#[allow(dead_code)]
pub struct Harness {
    pub transport: Arc<CannedTransport>,
    pub clipboard: Arc<dyn Clipboard>,
    pub opener: Arc<RecordingOpener>,
}

impl Harness {
    #[allow(dead_code)]
    pub fn new(body: &'static str) -> Self {
        Self::with_clipboard(body, Arc::new(MemoryClipboard::default()))
    }

    #[allow(dead_code)]
    pub fn with_clipboard(body: &'static str, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            transport: Arc::new(CannedTransport {
                body,
                requests: Mutex::new(Vec::new()),
            }),
            clipboard,
            opener: Arc::new(RecordingOpener::default()),
        }
    }

    #[allow(dead_code)]
    pub fn uploader(&self) -> UploadClient {
        UploadClient::new(self.transport.clone()).with_clock(|| 42)
    }

    #[allow(dead_code)]
    pub fn bar(&self, prefix: &str) -> ActionBar {
        ActionBar::new(
            prefix,
            self.uploader(),
            self.clipboard.clone(),
            self.opener.clone(),
        )
    }

    #[allow(dead_code)]
    pub fn opened(&self) -> Vec<String> {
        self.opener.opened.lock().expect("opener lock").clone()
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Vec<UploadPart>> {
        self.transport.requests.lock().expect("request lock").clone()
    }
}
