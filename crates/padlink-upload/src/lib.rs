#![warn(missing_docs)]
//! # padlink-upload
//!
//! ## Purpose
//! Implements the upload transaction shared by every capture mode.
//!
//! ## Responsibilities
//! - Name uploads as `<prefix>_<unix_ms>.<ext>`.
//! - Package one or more files into a single multipart request through an
//!   injectable [`UploadTransport`].
//! - Interpret the server answer into a [`padlink_core::UploadOutcome`].
//!
//! ## Data flow
//! [`padlink_core::ActionPayload`] -> [`UploadClient::upload_payload`] ->
//! [`UploadPart`] -> [`UploadTransport::send`] -> [`TransportResponse`] ->
//! [`padlink_core::UploadOutcome`].
//!
//! ## Error model
//! Uploads are single-shot: there is no retry and no backoff. Transport
//! failures are folded into [`padlink_core::UploadOutcome::TransportFailed`]
//! so callers always handle exactly three outcomes.
//!
//! ## Privacy notes
//! Payload bytes are never logged; only filename, size and SHA-256 digest.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use padlink_core::{
    ActionPayload, UPLOAD_FIELD_NAME, UploadBody, UploadOutcome, unix_millis_now, upload_filename,
};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// One file inside a multipart upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    /// Multipart field name.
    pub field: String,
    /// Filename attached to the part.
    pub filename: String,
    /// Mime type attached to the part.
    pub mime: String,
    /// File content.
    pub bytes: Vec<u8>,
}

impl UploadPart {
    /// Creates a part under the relay's fixed field name.
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: UPLOAD_FIELD_NAME.to_string(),
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Raw HTTP answer handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Abstract multipart transport used by [`UploadClient`].
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Posts all parts as one multipart request.
    ///
    /// # Errors
    /// Returns [`TransportError`] only when no HTTP answer was received.
    async fn send(&self, parts: &[UploadPart]) -> Result<TransportResponse, TransportError>;
}

/// Upload client shared by the drawing, scan, text and photo modes.
#[derive(Clone)]
pub struct UploadClient {
    transport: Arc<dyn UploadTransport>,
    clock: fn() -> u64,
}

impl UploadClient {
    /// Creates an upload client using the wall clock for filenames.
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            transport,
            clock: unix_millis_now,
        }
    }

    /// Replaces the millisecond clock used for filename generation.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the timestamped part for one body.
    pub fn prepare(&self, body: UploadBody, filename_prefix: &str) -> UploadPart {
        let filename = upload_filename(filename_prefix, (self.clock)(), &body.extension);
        UploadPart::new(filename, body.mime, body.bytes)
    }

    /// Uploads one body under a generated filename.
    pub async fn upload(&self, body: UploadBody, filename_prefix: &str) -> UploadOutcome {
        let part = self.prepare(body, filename_prefix);
        self.upload_parts(vec![part]).await
    }

    /// Uploads the current action payload.
    pub async fn upload_payload(&self, payload: &ActionPayload) -> UploadOutcome {
        self.upload(payload.to_upload_body(), payload.filename_prefix())
            .await
    }

    /// Sends already-named parts as one multipart request.
    ///
    /// An empty part list is rejected locally without touching the network.
    pub async fn upload_parts(&self, parts: Vec<UploadPart>) -> UploadOutcome {
        if parts.is_empty() {
            return UploadOutcome::TransportFailed {
                reason: "no files to upload".to_string(),
            };
        }

        for part in &parts {
            info!(
                "upload start file={} mime={} size={} sha256={}",
                part.filename,
                part.mime,
                part.bytes.len(),
                content_digest(&part.bytes)
            );
        }

        let outcome = match self.transport.send(&parts).await {
            Ok(response) => UploadOutcome::from_response(response.status, &response.body),
            Err(error) => UploadOutcome::TransportFailed {
                reason: error.to_string(),
            },
        };

        match &outcome {
            UploadOutcome::Saved { files } => info!("upload saved files={files:?}"),
            UploadOutcome::ServerRejected { message } => warn!("upload rejected: {message}"),
            UploadOutcome::TransportFailed { reason } => warn!("upload failed: {reason}"),
        }
        outcome
    }
}

/// Hex-encoded SHA-256 digest of upload content.
///
/// Identical content always yields the same digest, which lets logs correlate
/// repeated pushes of the same payload.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Failures that prevented any HTTP answer from being received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established or was reset.
    #[error("network failure: {0}")]
    Network(String),
    /// Request timed out.
    #[error("request timed out")]
    Timeout,
    /// Request could not be built from the given parts.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Endpoint answered with a non-success status on a non-upload route.
    #[error("unexpected http status {0}")]
    Status(u16),
}
