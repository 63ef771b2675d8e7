//! Shared fixtures for app integration tests.

use std::sync::Arc;
use std::time::Duration;

use padlink_app::HttpRelay;
use padlink_ui::{ActionBar, CapabilityError, MemoryClipboard, UrlOpener};
use padlink_upload::UploadClient;
use url::Url;

/// Opener that never launches anything.
pub struct NoopOpener;

impl UrlOpener for NoopOpener {
    fn open(&self, _url: &str) -> Result<(), CapabilityError> {
        Ok(())
    }
}

/// Relay client pointed at a mock server.
pub fn relay_for(server_url: &str) -> HttpRelay {
    let base = Url::parse(server_url).expect("mock server url should parse");
    HttpRelay::new(base, Duration::from_secs(5)).expect("client should build")
}

/// Upload client with a fixed filename clock.
pub fn uploader_for(relay: &HttpRelay) -> UploadClient {
    UploadClient::new(Arc::new(relay.clone())).with_clock(|| 42)
}

/// Action bar backed by the relay and an in-memory clipboard.
#[allow(dead_code)]
pub fn bar_for(relay: &HttpRelay, prefix: &str) -> ActionBar {
    ActionBar::new(
        prefix,
        uploader_for(relay),
        Arc::new(MemoryClipboard::default()),
        Arc::new(NoopOpener),
    )
}
