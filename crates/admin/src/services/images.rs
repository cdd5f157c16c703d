//! Image host upload service for blog covers.
//!
//! The admin form posts the raw file here; the hosted URL string is what
//! the backend stores on the blog document.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::UploadConfig;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("image host returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The host's response carried no URL.
    #[error("image host response had no secure_url")]
    MissingUrl,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Client for the image host's upload endpoint.
#[derive(Clone)]
pub struct ImageUploader {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ImageUploader {
    /// Create a new uploader.
    ///
    /// # Panics
    ///
    /// This function will not panic. The reqwest configuration uses only a
    /// request timeout, which is always accepted by `ClientBuilder`.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .expect("reqwest client with only a timeout is valid");

        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.expose_secret().to_string(),
        }
    }

    /// Upload a blog cover; returns the hosted URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the response has no URL.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Blog cover upload rejected");
            return Err(UploadError::Status(status));
        }

        let body: UploadResponse = response.json().await?;
        body.secure_url.or(body.url).ok_or(UploadError::MissingUrl)
    }
}
