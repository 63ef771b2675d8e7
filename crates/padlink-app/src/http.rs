//! reqwest adapter implementing every network port against the relay server.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use padlink_canvas::{CanvasSizeSource, SizeSyncError};
use padlink_core::endpoints::{
    CANVAS_SIZE_PATH, FILES_PATH, UPLOAD_PATH, download_url, endpoint_url,
};
use padlink_core::{CanvasSize, RemoteFile, parse_file_list};
use padlink_files::{FileIndex, FilesError};
use padlink_upload::{TransportError, TransportResponse, UploadPart, UploadTransport};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::{AppError, RelayConfig};

/// HTTP client bound to one relay server.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    base: Url,
}

impl HttpRelay {
    /// Creates a client with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the HTTP client cannot be built.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Client(error.to_string()))?;
        Ok(Self { client, base })
    }

    /// Creates a client from validated configuration.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for a bad server URL and
    /// [`AppError::Client`] when the HTTP client cannot be built.
    pub fn from_config(config: &RelayConfig) -> Result<Self, AppError> {
        Self::new(config.server_base()?, config.request_timeout())
    }

    /// Server base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn get_ok(&self, url: Url) -> Result<Vec<u8>, TransportError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(body.to_vec())
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        endpoint_url(&self.base, path).map_err(|error| TransportError::InvalidRequest(error.to_string()))
    }
}

#[async_trait]
impl UploadTransport for HttpRelay {
    async fn send(&self, parts: &[UploadPart]) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        let mut form = Form::new();
        for part in parts {
            let file = Part::bytes(part.bytes.clone())
                .file_name(part.filename.clone())
                .mime_str(&part.mime)
                .map_err(|error| TransportError::InvalidRequest(error.to_string()))?;
            form = form.part(part.field.clone(), file);
        }

        debug!("POST {url} parts={}", parts.len());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl CanvasSizeSource for HttpRelay {
    async fn fetch_canvas_size(&self) -> Result<CanvasSize, SizeSyncError> {
        let body = self.get_ok(self.endpoint(CANVAS_SIZE_PATH)?).await?;
        Ok(CanvasSize::from_json_bytes(&body)?)
    }
}

#[async_trait]
impl FileIndex for HttpRelay {
    async fn list_files(&self) -> Result<Vec<RemoteFile>, FilesError> {
        let body = self.get_ok(self.endpoint(FILES_PATH)?).await?;
        Ok(parse_file_list(&body)?)
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, FilesError> {
        let url = download_url(&self.base, filename)?;
        Ok(self.get_ok(url).await?)
    }
}

fn transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if let Some(status) = error.status() {
        TransportError::Status(status.as_u16())
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Network(error.to_string())
    }
}
