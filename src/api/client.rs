//! HTTP client for the compression service

use super::error::{ApiError, ApiResult};
use super::types::{
    BatchResponse, ClearAck, ConnectionStatus, HistoryEnvelope, MethodCatalog, MAX_FILE_BYTES,
};
use crate::config::{AspectRatio, ClientConfig, SortKey, SortOrder};
use crate::stats::AggregateStatistics;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the client-side destination folder for compressed output
const OUTPUT_FOLDER_HEADER: &str = "X-Output-Folder";

/// Multipart field name the service reads uploaded files from
const UPLOAD_FIELD: &str = "images";

/// Client for the compression service HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client with timeouts applied
    http: reqwest::Client,

    /// Service base URL, normalized to end with a slash
    base: Url,
}

impl ApiClient {
    /// Create a new client from configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use squeeze::api::ApiClient;
    /// use squeeze::config::ClientConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClientConfig::default();
    /// let client = ApiClient::new(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut base = Url::parse(&config.service_url)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", config.service_url, e)))?;

        // Url::join treats the last path segment as a file unless the
        // base ends with a slash
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { http, base })
    }

    /// Resolve an endpoint path against the base URL
    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", path, e)))
    }

    /// Submit a batch of files for lossy JPEG compression
    ///
    /// # Arguments
    ///
    /// * `files` - Local paths to upload
    /// * `quality` - JPEG quality, 1-100
    /// * `aspect` - Aspect ratio conversion to apply
    /// * `output_dir` - Folder the service should write compressed copies to
    pub async fn upload_jpeg(
        &self,
        files: &[PathBuf],
        quality: u8,
        aspect: AspectRatio,
        output_dir: Option<&Path>,
    ) -> ApiResult<BatchResponse> {
        let path = format!(
            "upload-images/{}/{}/{}/jpeg",
            quality,
            MAX_FILE_BYTES,
            aspect.as_str()
        );
        let url = self.endpoint(&path)?;
        debug!(url = %url, files = files.len(), "submitting JPEG batch");

        let form = Self::build_upload_form(files).await?;
        let mut request = self.http.post(url).multipart(form);
        if let Some(dir) = output_dir {
            request = request.header(OUTPUT_FOLDER_HEADER, dir.display().to_string());
        }

        Self::parse(request.send().await?).await
    }

    /// Submit a batch of files for lossless Huffman coding
    pub async fn compress_huffman(
        &self,
        files: &[PathBuf],
        output_dir: Option<&Path>,
    ) -> ApiResult<BatchResponse> {
        let url = self.endpoint("compress-huffman")?;
        debug!(url = %url, files = files.len(), "submitting Huffman batch");

        let form = Self::build_upload_form(files).await?;
        let mut request = self.http.post(url).multipart(form);
        if let Some(dir) = output_dir {
            request = request.header(OUTPUT_FOLDER_HEADER, dir.display().to_string());
        }

        Self::parse(request.send().await?).await
    }

    /// Fetch compression history, sorted by the service
    pub async fn fetch_history(
        &self,
        sort: SortKey,
        order: SortOrder,
    ) -> ApiResult<HistoryEnvelope> {
        let url = self.endpoint("history")?;
        debug!(url = %url, sort = sort.as_str(), order = order.as_str(), "fetching history");

        let response = self
            .http
            .get(url)
            .query(&[("sort_by", sort.as_str()), ("order", order.as_str())])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch aggregate statistics computed by the service
    pub async fn fetch_statistics(&self) -> ApiResult<AggregateStatistics> {
        let url = self.endpoint("history/statistics")?;
        debug!(url = %url, "fetching statistics");

        Self::parse(self.http.get(url).send().await?).await
    }

    /// Delete all history records on the service
    pub async fn clear_history(&self) -> ApiResult<ClearAck> {
        let url = self.endpoint("history/clear")?;
        debug!(url = %url, "clearing history");

        Self::parse(self.http.delete(url).send().await?).await
    }

    /// List the compression methods the service offers
    pub async fn list_methods(&self) -> ApiResult<MethodCatalog> {
        let url = self.endpoint("compression-methods")?;
        debug!(url = %url, "listing compression methods");

        Self::parse(self.http.get(url).send().await?).await
    }

    /// Probe the service for liveness
    pub async fn test_connection(&self) -> ApiResult<ConnectionStatus> {
        let url = self.endpoint("test-connection")?;
        debug!(url = %url, "testing connection");

        Self::parse(self.http.get(url).send().await?).await
    }

    /// Stage local files into a multipart form
    async fn build_upload_form(files: &[PathBuf]) -> ApiResult<Form> {
        let mut form = Form::new();
        for path in files {
            let bytes = tokio::fs::read(path).await?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let part = Part::bytes(bytes)
                .file_name(name)
                .mime_str(mime.essence_str())?;
            form = form.part(UPLOAD_FIELD, part);
        }
        Ok(form)
    }

    /// Read a response body and decode it, mapping failure statuses to
    /// Service errors and undecodable bodies to MalformedResponse
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}
