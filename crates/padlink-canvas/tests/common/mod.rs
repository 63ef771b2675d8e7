//! Shared fixtures for canvas integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use padlink_canvas::{
    CanvasEngine, CanvasSizeSource, MemorySnapshotStore, SizeSyncError, SnapshotStore,
};
use padlink_core::CanvasSize;
use padlink_upload::{
    TransportError, TransportResponse, UploadClient, UploadPart, UploadTransport,
};

/// Size source answering with a fixed size, or failing, and counting calls.
pub struct CountingSizeSource {
    pub answer: Option<CanvasSize>,
    pub calls: AtomicUsize,
}

impl CountingSizeSource {
    pub fn answering(width: u32, height: u32) -> Self {
        Self {
            answer: Some(CanvasSize::new(width, height).expect("valid size")),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CanvasSizeSource for CountingSizeSource {
    async fn fetch_canvas_size(&self) -> Result<CanvasSize, SizeSyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or(SizeSyncError::Transport(TransportError::Network(
                "connection refused".to_string(),
            )))
    }
}

/// Transport recording parts and answering with a canned body.
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

pub fn fixed_clock() -> u64 {
    1_234
}

/// Engine wired to in-memory collaborators.
pub struct Harness {
    pub engine: CanvasEngine,
    pub sizes: Arc<CountingSizeSource>,
    pub store: Arc<MemorySnapshotStore>,
    pub transport: Arc<CannedTransport>,
}

impl Harness {
    pub fn new(sizes: CountingSizeSource, store: MemorySnapshotStore) -> Self {
        let sizes = Arc::new(sizes);
        let store = Arc::new(store);
        let transport = Arc::new(CannedTransport {
            body: r#"{"success":true,"files":["signature_1234.png"]}"#,
            requests: Mutex::new(Vec::new()),
        });
        let uploader = UploadClient::new(transport.clone()).with_clock(fixed_clock);
        let engine = CanvasEngine::new(
            CanvasSize::BROWSER_DEFAULT,
            sizes.clone(),
            store.clone() as Arc<dyn SnapshotStore>,
            uploader,
        );
        Self {
            engine,
            sizes,
            store,
            transport,
        }
    }

    #[allow(dead_code)]
    pub fn cached(&self) -> Option<String> {
        self.store.load().expect("memory store should load")
    }
}
