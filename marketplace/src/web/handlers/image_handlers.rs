// furrow_market/src/web/handlers/image_handlers.rs

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::ImageLimits;
use crate::errors::AppError;
use crate::flows::contexts::UploadImagesCtxData;
use crate::models::PendingImage;
use crate::services::image_service;
use crate::state::AppState;
use crate::web::extractors::{parse_query, AuthenticatedUser};
use furrow::{ContextData, FlowOutcome};

const IMAGES_FIELD: &str = "images";

#[derive(Deserialize, Debug)]
pub struct ImageKeyQuery {
  pub key: Option<String>,
}

fn malformed(e: MultipartError) -> AppError {
  AppError::invalid(IMAGES_FIELD, format!("malformed multipart body: {}", e))
}

/// Buffers one file, giving up as soon as it passes the size limit.
async fn read_file(mut field: Field, index: usize, limits: &ImageLimits) -> Result<PendingImage, AppError> {
  let filename = field
    .content_disposition()
    .and_then(|cd| cd.get_filename())
    .unwrap_or("upload")
    .to_string();
  let mime_type = field
    .content_type()
    .map(|m| m.essence_str().to_ascii_lowercase())
    .unwrap_or_else(|| "application/octet-stream".to_string());

  let mut bytes = Vec::new();
  while let Some(chunk) = field.try_next().await.map_err(malformed)? {
    if bytes.len() + chunk.len() > limits.max_bytes {
      return Err(AppError::invalid(
        format!("images[{}]", index),
        format!("'{}' exceeds the {} byte limit", filename, limits.max_bytes),
      ));
    }
    bytes.extend_from_slice(&chunk);
  }

  Ok(PendingImage {
    filename,
    mime_type,
    bytes,
  })
}

#[instrument(name = "handler::upload_images", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn upload_images_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let limits = app_state.config.images.clone();
  let mut files: Vec<PendingImage> = Vec::new();

  while let Some(field) = payload.try_next().await.map_err(malformed)? {
    if field.name() != Some(IMAGES_FIELD) {
      debug!(field = ?field.name(), "Skipping unrelated multipart field.");
      continue;
    }
    if files.len() == limits.max_files {
      return Err(AppError::invalid(
        IMAGES_FIELD,
        format!("at most {} images may be uploaded at once", limits.max_files),
      ));
    }
    files.push(read_file(field, files.len(), &limits).await?);
  }

  let ctx = ContextData::new(UploadImagesCtxData {
    app_state: app_state.get_ref().clone(),
    farmer_id: auth_user.user_id,
    files,
    uploaded: Vec::new(),
  });

  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => {
      let uploaded = std::mem::take(&mut ctx.write().uploaded);
      Ok(HttpResponse::Created().json(json!({ "images": uploaded })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("upload_images was halted by a step".to_string())),
  }
}

/// Deletes one object. Keys outside the caller's `{userId}/` prefix are
/// reported as missing and left alone.
#[instrument(name = "handler::delete_image", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_image_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req: HttpRequest,
) -> Result<HttpResponse, AppError> {
  let query: ImageKeyQuery = parse_query(&req)?;
  let key = query
    .key
    .as_deref()
    .map(str::trim)
    .filter(|k| !k.is_empty())
    .ok_or_else(|| AppError::invalid("key", "is required"))?;

  if !image_service::owns_key(auth_user.user_id, key) {
    warn!(%key, "Image delete outside the caller's prefix.");
    return Err(AppError::NotFound(format!("Image '{}' not found.", key)));
  }

  app_state.storage.delete_object(key).await?;
  info!(%key, "Image deleted.");
  Ok(HttpResponse::Ok().json(json!({ "deleted": true, "key": key })))
}
