// furrow_market/src/models/image.rs

use serde::{Deserialize, Serialize};

/// A stored listing image as reported back to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
  pub url: String,
  /// Object path inside the bucket, `{userId}/{unixMillis}-{random}.{ext}`.
  pub key: String,
  pub filename: String,
  pub size: u64,
  pub mime_type: String,
}

/// A file read from the multipart body, not yet validated or stored.
#[derive(Clone)]
pub struct PendingImage {
  pub filename: String,
  pub mime_type: String,
  pub bytes: Vec<u8>,
}

impl PendingImage {
  pub fn size(&self) -> usize {
    self.bytes.len()
  }
}

impl std::fmt::Debug for PendingImage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PendingImage")
      .field("filename", &self.filename)
      .field("mime_type", &self.mime_type)
      .field("size", &self.bytes.len())
      .finish()
  }
}
