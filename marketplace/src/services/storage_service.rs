// furrow_market/src/services/storage_service.rs

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Object storage for listing images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
  async fn put_object(&self, key: &str, bytes: Vec<u8>, mime_type: &str) -> Result<()>;

  async fn delete_object(&self, key: &str) -> Result<()>;

  /// Publicly readable URL for `key`.
  fn public_url(&self, key: &str) -> String;
}

/// The hosted storage API under `{BACKEND_URL}/storage/v1/object`.
#[derive(Clone)]
pub struct HostedStorageClient {
  http: reqwest::Client,
  base_url: String,
  bucket: String,
  service_key: String,
}

impl HostedStorageClient {
  pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
    Self {
      http,
      base_url: config.backend_url.clone(),
      bucket: config.storage_bucket.clone(),
      service_key: config.backend_service_key.clone(),
    }
  }

  /// Each key segment is percent-encoded, so `%2e%2e` stays literal.
  fn object_endpoint(&self, key: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(&self.base_url)
      .map_err(|e| AppError::Config(format!("Invalid BACKEND_URL '{}': {}", self.base_url, e)))?;
    url
      .path_segments_mut()
      .map_err(|_| AppError::Config(format!("BACKEND_URL '{}' cannot carry a path", self.base_url)))?
      .pop_if_empty()
      .extend(["storage", "v1", "object", self.bucket.as_str()])
      .extend(key.split('/'));
    Ok(url)
  }
}

async fn ensure_success(resp: reqwest::Response, operation: &str) -> Result<()> {
  let status = resp.status();
  if status.is_success() {
    return Ok(());
  }
  let body = resp.text().await.unwrap_or_default();
  Err(AppError::Storage(format!("{} failed: {} - {}", operation, status, body)))
}

#[async_trait]
impl ObjectStorage for HostedStorageClient {
  #[instrument(name = "storage::put_object", skip(self, bytes), fields(size = bytes.len()))]
  async fn put_object(&self, key: &str, bytes: Vec<u8>, mime_type: &str) -> Result<()> {
    let resp = self
      .http
      .post(self.object_endpoint(key)?)
      .header("Authorization", format!("Bearer {}", self.service_key))
      .header("apikey", &self.service_key)
      .header(reqwest::header::CONTENT_TYPE, mime_type)
      .header("x-upsert", "false")
      .body(bytes)
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("upload request failed: {}", e)))?;
    ensure_success(resp, "upload").await?;
    debug!("Object stored.");
    Ok(())
  }

  #[instrument(name = "storage::delete_object", skip(self))]
  async fn delete_object(&self, key: &str) -> Result<()> {
    let resp = self
      .http
      .delete(self.object_endpoint(key)?)
      .header("Authorization", format!("Bearer {}", self.service_key))
      .header("apikey", &self.service_key)
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("delete request failed: {}", e)))?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Err(AppError::NotFound(format!("Image '{}' not found.", key)));
    }
    ensure_success(resp, "delete").await
  }

  fn public_url(&self, key: &str) -> String {
    format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, key)
  }
}
