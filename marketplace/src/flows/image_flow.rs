// furrow_market/src/flows/image_flow.rs

use crate::errors::AppError;
use crate::flows::contexts::UploadImagesCtxData;
use crate::models::UploadedImage;
use crate::services::image_service;
use chrono::Utc;
use furrow::{ContextData, Flow, FlowControl, Flows};
use tracing::{error, info, warn};

/// Validate every file, then upload every file. Nothing is uploaded unless the
/// whole batch passes.
pub fn register_upload_images_flow(flows: &Flows<AppError>) {
  let mut flow = Flow::<UploadImagesCtxData, AppError>::new("upload_images", &["validate_batch", "upload_batch"]);

  flow.on_step("validate_batch", |ctx_data: ContextData<UploadImagesCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      image_service::validate_batch(&guard.files, &guard.app_state.config.images)?;
      info!(count = guard.files.len(), "Image batch accepted.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on_step("upload_batch", |ctx_data: ContextData<UploadImagesCtxData>| {
    Box::pin(async move {
      let (storage, farmer_id, files) = {
        let mut guard = ctx_data.write();
        let files = std::mem::take(&mut guard.files);
        (guard.app_state.storage.clone(), guard.farmer_id, files)
      };

      let mut uploaded: Vec<UploadedImage> = Vec::with_capacity(files.len());
      for file in files {
        let key = image_service::object_key(farmer_id, &file.mime_type, Utc::now());
        let size = file.size() as u64;
        if let Err(e) = storage.put_object(&key, file.bytes, &file.mime_type).await {
          error!(error = %e, %key, stored = uploaded.len(), "Upload failed, removing the objects already stored.");
          for done in &uploaded {
            if let Err(cleanup_err) = storage.delete_object(&done.key).await {
              warn!(error = %cleanup_err, key = %done.key, "Could not remove a partially uploaded image.");
            }
          }
          return Err(e);
        }
        uploaded.push(UploadedImage {
          url: storage.public_url(&key),
          key,
          filename: file.filename,
          size,
          mime_type: file.mime_type,
        });
      }

      info!(%farmer_id, count = uploaded.len(), "Image batch stored.");
      ctx_data.write().uploaded = uploaded;
      Ok(FlowControl::Continue)
    })
  });

  flows.register_flow(flow);
}
