#![warn(missing_docs)]
//! # padlink-core
//!
//! ## Purpose
//! Defines the pure data model shared by every capture mode of `padlink`.
//!
//! ## Responsibilities
//! - Represent server-declared canvas geometry.
//! - Represent the "current payload" an action bar operates on, including the
//!   URL classification that gates the open action.
//! - Generate timestamped upload filenames.
//! - Interpret upload and file-list responses into strict result values.
//! - Name the relay endpoints ([`endpoints`]).
//!
//! ## Data flow
//! A capture mode produces text or bytes -> [`ActionPayload`] classifies it ->
//! the upload crate turns it into an [`UploadBody`] with a generated filename ->
//! the server answer becomes an [`UploadOutcome`] rendered on a
//! [`StatusLine`].
//!
//! ## Ownership and lifetimes
//! Payloads own their text/byte buffers so an upload can outlive the input
//! buffer that produced it.
//!
//! ## Error model
//! Decoding failures and invalid geometry return [`CoreError`]. Upload
//! responses never fail to interpret: malformed bodies become
//! [`UploadOutcome::TransportFailed`].
//!
//! ## Example
//! ```rust
//! use padlink_core::{ActionPayload, PayloadKind};
//!
//! let payload = ActionPayload::from_text("example.com", "text").expect("non-empty");
//! assert_eq!(payload.kind(), PayloadKind::Url);
//! assert_eq!(payload.open_url().as_deref(), Some("https://example.com"));
//! ```

pub mod endpoints;
mod status;

use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use status::{StatusLine, status_text};

/// Multipart field name the relay server reads uploaded files from.
pub const UPLOAD_FIELD_NAME: &str = "photos";

/// Mime type used when text payloads are wrapped into a file.
pub const TEXT_MIME: &str = "text/plain";

/// File extension used when text payloads are wrapped into a file.
pub const TEXT_EXTENSION: &str = "txt";

// `\w` is spelled as an ASCII class so classification matches browser regex
// semantics for non-ASCII input.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]+(/\S*)?$")
        .expect("url pattern is a valid regex")
});

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("scheme pattern is a valid regex"));

/// Logical canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Size a drawing surface has before the first size sync.
    pub const BROWSER_DEFAULT: CanvasSize = CanvasSize {
        width: 300,
        height: 150,
    };

    /// Constructs validated canvas geometry.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidCanvasSize`] when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidCanvasSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Decodes a `{width, height}` JSON body as served by `/canvas/size`.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] for malformed JSON and
    /// [`CoreError::InvalidCanvasSize`] for zero dimensions.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        let parsed: CanvasSize = serde_json::from_slice(raw)?;
        Self::new(parsed.width, parsed.height)
    }

    /// Number of pixels covered by this size.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Classification of the current payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    /// Free-form text.
    Text,
    /// Text that looks like a navigable web address.
    Url,
    /// Binary content such as an exported drawing.
    Blob,
}

/// Binary payload with the metadata needed to name and type the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobData {
    /// Raw content bytes.
    pub bytes: Vec<u8>,
    /// Mime type sent with the multipart part.
    pub mime: String,
    /// Extension appended to the generated filename, without the dot.
    pub extension: String,
}

/// Raw payload value held by an action bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    /// Text from a scan or the text buffer.
    Text(String),
    /// Bytes from a drawing export.
    Blob(BlobData),
}

/// Payload an action bar is armed with.
///
/// The classification is derived at construction and cannot drift from the
/// value it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPayload {
    value: PayloadValue,
    kind: PayloadKind,
    filename_prefix: String,
}

impl ActionPayload {
    /// Builds a text payload, classifying it as [`PayloadKind::Url`] when it
    /// matches the web-address pattern.
    ///
    /// Returns `None` for empty text; an empty value never arms an action bar.
    pub fn from_text(value: impl Into<String>, filename_prefix: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            return None;
        }

        Some(Self {
            kind: classify_text(&value),
            value: PayloadValue::Text(value),
            filename_prefix: filename_prefix.into(),
        })
    }

    /// Builds a binary payload.
    ///
    /// Returns `None` when the blob carries no bytes.
    pub fn from_blob(blob: BlobData, filename_prefix: impl Into<String>) -> Option<Self> {
        if blob.bytes.is_empty() {
            return None;
        }

        Some(Self {
            value: PayloadValue::Blob(blob),
            kind: PayloadKind::Blob,
            filename_prefix: filename_prefix.into(),
        })
    }

    /// Builds a payload from either value variant.
    pub fn from_value(value: PayloadValue, filename_prefix: impl Into<String>) -> Option<Self> {
        match value {
            PayloadValue::Text(text) => Self::from_text(text, filename_prefix),
            PayloadValue::Blob(blob) => Self::from_blob(blob, filename_prefix),
        }
    }

    /// Returns the payload classification.
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Returns the raw payload value.
    pub fn value(&self) -> &PayloadValue {
        &self.value
    }

    /// Returns the prefix used for generated upload filenames.
    pub fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }

    /// Returns the text representation, if this is a text payload.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            PayloadValue::Text(text) => Some(text),
            PayloadValue::Blob(_) => None,
        }
    }

    /// Returns the normalized URL for the open action.
    ///
    /// `None` unless the payload is classified as [`PayloadKind::Url`].
    pub fn open_url(&self) -> Option<String> {
        match self.kind {
            PayloadKind::Url => self.text().map(normalize_url),
            PayloadKind::Text | PayloadKind::Blob => None,
        }
    }

    /// Converts the payload into upload bytes.
    ///
    /// Text is wrapped as a UTF-8 plain-text file; blobs pass through.
    pub fn to_upload_body(&self) -> UploadBody {
        match &self.value {
            PayloadValue::Text(text) => UploadBody {
                bytes: text.as_bytes().to_vec(),
                mime: TEXT_MIME.to_string(),
                extension: TEXT_EXTENSION.to_string(),
            },
            PayloadValue::Blob(blob) => UploadBody {
                bytes: blob.bytes.clone(),
                mime: blob.mime.clone(),
                extension: blob.extension.clone(),
            },
        }
    }
}

/// Bytes and typing information for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBody {
    /// File content.
    pub bytes: Vec<u8>,
    /// Mime type of the content.
    pub mime: String,
    /// Extension without the leading dot.
    pub extension: String,
}

/// Classifies text as [`PayloadKind::Url`] or [`PayloadKind::Text`].
pub fn classify_text(value: &str) -> PayloadKind {
    if URL_PATTERN.is_match(value) {
        PayloadKind::Url
    } else {
        PayloadKind::Text
    }
}

/// Returns `true` when `value` matches the web-address pattern.
pub fn is_openable_url(value: &str) -> bool {
    classify_text(value) == PayloadKind::Url
}

/// Prefixes `https://` unless the value already carries an http(s) scheme.
pub fn normalize_url(value: &str) -> String {
    if SCHEME_PREFIX.is_match(value) {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}

/// Builds `<prefix>_<unix_ms>.<extension>`.
pub fn upload_filename(prefix: &str, unix_ms: u64, extension: &str) -> String {
    format!("{prefix}_{unix_ms}.{extension}")
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn unix_millis_now() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Result of one upload transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Server stored the upload.
    Saved {
        /// Stored file names reported by the server, if any.
        files: Vec<String>,
    },
    /// Server answered with `success: false`.
    ServerRejected {
        /// Server-provided message, surfaced verbatim.
        message: String,
    },
    /// Request failed or the answer was not a recognizable result.
    TransportFailed {
        /// Diagnostic detail for logs; never shown verbatim.
        reason: String,
    },
}

impl UploadOutcome {
    /// Interprets an HTTP answer from the upload endpoint.
    ///
    /// A JSON body carrying a `success` flag is authoritative regardless of the
    /// HTTP status code. Anything else is a transport failure.
    pub fn from_response(http_status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<UploadResponse>(body) {
            Ok(response) if response.success => UploadOutcome::Saved {
                files: response.files,
            },
            Ok(response) => UploadOutcome::ServerRejected {
                message: response.error.unwrap_or_default(),
            },
            Err(error) => UploadOutcome::TransportFailed {
                reason: format!("http {http_status}: unreadable upload response: {error}"),
            },
        }
    }

    /// Returns `true` when the server stored the upload.
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Saved { .. })
    }

    /// User-visible status text for this outcome.
    pub fn status_text(&self) -> String {
        match self {
            UploadOutcome::Saved { .. } => status_text::SAVED.to_string(),
            UploadOutcome::ServerRejected { message } => status_text::upload_error(message),
            UploadOutcome::TransportFailed { .. } => status_text::UPLOAD_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    files: Vec<String>,
}

/// One entry of the remote file list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Base name without extension.
    pub name: String,
    /// Extension including the leading dot (may be empty).
    pub ext: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time in Unix seconds; may carry a fractional part.
    pub mtime: f64,
}

impl RemoteFile {
    /// Name the download endpoint expects (`name + ext`).
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }

    /// Modification time in the local time zone.
    pub fn modified_local(&self) -> Option<DateTime<Local>> {
        if !self.mtime.is_finite() {
            return None;
        }
        let millis = (self.mtime * 1_000.0).round() as i64;
        DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local))
    }

    /// Modification time formatted for a table cell.
    pub fn modified_display(&self) -> String {
        self.modified_local()
            .map(|local| local.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Decodes the `/api/file_share/files` body.
///
/// # Errors
/// Returns [`CoreError::Codec`] when the body is not a list of file entries.
pub fn parse_file_list(raw: &[u8]) -> Result<Vec<RemoteFile>, CoreError> {
    serde_json::from_slice(raw).map_err(CoreError::Codec)
}

/// Error type for core model validation and decoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Canvas geometry must be strictly positive.
    #[error("invalid canvas size {width}x{height}: both sides must be greater than zero")]
    InvalidCanvasSize {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// JSON decoding failure.
    #[error("response codec failure: {0}")]
    Codec(#[from] serde_json::Error),
    /// Endpoint URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
