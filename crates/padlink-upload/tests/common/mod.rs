//! Shared fixtures for upload integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use padlink_upload::{TransportError, TransportResponse, UploadPart, UploadTransport};

/// Transport that records every request and answers with a canned body.
pub struct RecordingTransport {
    pub requests: Mutex<Vec<Vec<UploadPart>>>,
    pub status: u16,
    pub body: &'static str,
}

impl RecordingTransport {
    #[allow(dead_code)]
    pub fn answering(status: u16, body: &'static str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            status,
            body,
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Vec<UploadPart>> {
        self.requests.lock().expect("request lock should work").clone()
    }
}

#[async_trait]
impl UploadTransport for RecordingTransport {
    async fn send(&self, parts: &[UploadPart]) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(parts.to_vec());
        Ok(TransportResponse {
            status: self.status,
            body: self.body.as_bytes().to_vec(),
        })
    }
}

/// Deterministic clock for filename assertions.
#[allow(dead_code)]
pub fn fixed_clock() -> u64 {
    1_700_000_000_000
}
