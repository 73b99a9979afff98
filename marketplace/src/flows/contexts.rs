// furrow_market/src/flows/contexts.rs

//! Context data for the request flows. Handlers receive these wrapped in
//! `furrow::ContextData` and write their results back into the `Option` slots.

use crate::models::{CreateProductPayload, DraftPayload, PendingImage, Product, ProductDraft, UploadedImage};
use crate::state::AppState;
use uuid::Uuid;

#[derive(Clone)]
pub struct CreateDraftCtxData {
  pub app_state: AppState,
  pub farmer_id: Uuid,
  pub payload: DraftPayload,
  pub saved_draft: Option<ProductDraft>,
}

#[derive(Clone)]
pub struct UpdateDraftCtxData {
  pub app_state: AppState,
  pub farmer_id: Uuid,
  pub draft_id: Option<Uuid>,
  pub payload: DraftPayload,
  pub saved_draft: Option<ProductDraft>,
}

#[derive(Clone)]
pub struct UploadImagesCtxData {
  pub app_state: AppState,
  pub farmer_id: Uuid,
  pub files: Vec<PendingImage>,
  pub uploaded: Vec<UploadedImage>,
}

#[derive(Clone)]
pub struct CreateProductCtxData {
  pub app_state: AppState,
  pub farmer_id: Uuid,
  pub payload: CreateProductPayload,
  pub created_product: Option<Product>,
  pub draft_retired: bool,
}
