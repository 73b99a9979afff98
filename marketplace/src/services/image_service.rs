// furrow_market/src/services/image_service.rs

//! Batch checks and object keys for listing images.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::ImageLimits;
use crate::errors::{AppError, Result};
use crate::models::PendingImage;

/// File extension stored in the object key for an accepted mime type.
pub fn extension_for(mime_type: &str) -> &'static str {
  match mime_type {
    "image/jpeg" | "image/jpg" => "jpg",
    "image/png" => "png",
    "image/webp" => "webp",
    "image/gif" => "gif",
    "image/avif" => "avif",
    _ => "bin",
  }
}

/// `{userId}/{unixMillis}-{random}.{ext}`
pub fn object_key(user_id: Uuid, mime_type: &str, now: DateTime<Utc>) -> String {
  let random = Uuid::new_v4().simple().to_string();
  format!(
    "{}/{}-{}.{}",
    user_id,
    now.timestamp_millis(),
    &random[..12],
    extension_for(mime_type)
  )
}

const KEY_EXTENSIONS: &[&str] = &["jpg", "png", "webp", "gif", "avif", "bin"];

/// Whether `key` is a key `object_key` could have issued for `user_id`:
/// exactly `{userId}/{digits}-{hex}.{ext}`, nothing else.
pub fn owns_key(user_id: Uuid, key: &str) -> bool {
  let prefix = format!("{}/", user_id);
  let Some(name) = key.strip_prefix(&prefix) else {
    return false;
  };
  let Some((stem, ext)) = name.split_once('.') else {
    return false;
  };
  let Some((millis, random)) = stem.split_once('-') else {
    return false;
  };
  !millis.is_empty()
    && millis.bytes().all(|b| b.is_ascii_digit())
    && !random.is_empty()
    && random.bytes().all(|b| b.is_ascii_hexdigit())
    && KEY_EXTENSIONS.contains(&ext)
}

/// Checks the count limit, then each file in order. The first failure rejects
/// the whole batch.
pub fn validate_batch(files: &[PendingImage], limits: &ImageLimits) -> Result<()> {
  if files.is_empty() {
    return Err(AppError::invalid("images", "at least one image file is required"));
  }
  if files.len() > limits.max_files {
    return Err(AppError::invalid(
      "images",
      format!("at most {} images may be uploaded at once", limits.max_files),
    ));
  }
  for (idx, file) in files.iter().enumerate() {
    check_file(idx, file, limits)?;
  }
  Ok(())
}

fn check_file(idx: usize, file: &PendingImage, limits: &ImageLimits) -> Result<()> {
  let field = format!("images[{}]", idx);
  if !limits.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(&file.mime_type)) {
    return Err(AppError::invalid(
      field,
      format!(
        "'{}' has unsupported type '{}'; allowed: {}",
        file.filename,
        file.mime_type,
        limits.allowed_types.join(", ")
      ),
    ));
  }
  if file.size() == 0 {
    return Err(AppError::invalid(field, format!("'{}' is empty", file.filename)));
  }
  if file.size() > limits.max_bytes {
    return Err(AppError::invalid(
      field,
      format!("'{}' exceeds the {} byte limit", file.filename, limits.max_bytes),
    ));
  }
  Ok(())
}
