#![warn(missing_docs)]
//! # padlink-app
//!
//! ## Purpose
//! Wires the capture modes to a real relay server and the local machine, and
//! hosts the `padlink` command-line client.
//!
//! ## Responsibilities
//! - Load and validate [`RelayConfig`].
//! - Implement every network port with one reqwest client ([`HttpRelay`]).
//! - Provide OS adapters for the clipboard, URL opening, the scan decoder
//!   input and the recovery prompt.
//! - Install logging and expose the build version.
//!
//! ## Data flow
//! CLI flags + env + TOML -> [`RelayConfig`] -> [`HttpRelay`] + adapters ->
//! capture engines -> status output.
//!
//! ## Error model
//! Startup failures are [`AppError`]. Capture-mode failures stay inside the
//! engines and surface as status text.

mod config;
mod http;
mod platform;
mod strokes;

use std::path::Path;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use thiserror::Error;

pub use config::{ConfigError, ENV_CACHE_DIR, ENV_DOWNLOAD_DIR, ENV_SERVER_URL, RelayConfig};
pub use http::HttpRelay;
pub use platform::{
    CommandOpener, LineDecodeCamera, RECOVERY_QUESTION, SystemClipboard, TerminalPrompt,
    is_secure_context, recovery_choice_from_answer,
};
pub use strokes::{DisplaySpec, StrokeScript, StrokeStep, parse_strokes};

/// Build-time application version loaded from the root `VERSION` file.
pub const APP_VERSION: &str = env!("PADLINK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Installs the process logger at `level`.
///
/// # Errors
/// Returns [`AppError::Logging`] when a logger is already installed.
pub fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    SimpleLogger::new()
        .with_level(level)
        .with_local_timestamps()
        .init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Mime type for a photo path, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("bmp") => "image/bmp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// App wiring failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(String),
    /// Logger installation failed.
    #[error("logging error: {0}")]
    Logging(String),
    /// Stroke script could not be read.
    #[error("invalid stroke script: {0}")]
    Strokes(String),
}
