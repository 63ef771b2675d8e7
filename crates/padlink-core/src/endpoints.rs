//! Relay server endpoint paths and URL construction.

use url::Url;

use crate::CoreError;

/// Upload endpoint path.
pub const UPLOAD_PATH: &str = "/api/file_share/upload";
/// File list endpoint path.
pub const FILES_PATH: &str = "/api/file_share/files";
/// Download endpoint path.
pub const DOWNLOAD_PATH: &str = "/api/file_share/download";
/// Canvas size endpoint path.
pub const CANVAS_SIZE_PATH: &str = "/canvas/size";

/// Resolves an absolute endpoint path against the server base URL.
///
/// # Errors
/// Returns [`CoreError::InvalidUrl`] when the path cannot be joined.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, CoreError> {
    base.join(path)
        .map_err(|error| CoreError::InvalidUrl(format!("{base} + {path}: {error}")))
}

/// Download URL for `filename`, with the name form-encoded in the query.
///
/// # Errors
/// Returns [`CoreError::InvalidUrl`] when the base cannot be joined.
pub fn download_url(base: &Url, filename: &str) -> Result<Url, CoreError> {
    let mut url = endpoint_url(base, DOWNLOAD_PATH)?;
    url.query_pairs_mut().clear().append_pair("filename", filename);
    Ok(url)
}
