// furrow_market/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::flows::contexts::CreateProductCtxData;
use crate::format::format_number;
use crate::models::{CreateProductPayload, ProductStatus};
use crate::state::AppState;
use crate::web::extractors::{read_json, AuthenticatedUser};
use furrow::{ContextData, FlowOutcome};

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: ProductStatus,
}

/// Submits a listing. With `draftId`, the draft it was built from is removed.
#[instrument(name = "handler::create_product", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_product_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let payload: CreateProductPayload = read_json(payload).await?;
  let ctx = ContextData::new(CreateProductCtxData {
    app_state: app_state.get_ref().clone(),
    farmer_id: auth_user.user_id,
    payload,
    created_product: None,
    draft_retired: false,
  });

  match app_state.flows.run(ctx.clone()).await? {
    FlowOutcome::Completed => {
      let (product, draft_retired) = {
        let mut guard = ctx.write();
        (guard.created_product.take(), guard.draft_retired)
      };
      let product =
        product.ok_or_else(|| AppError::Internal("create_product completed without a product".to_string()))?;
      let total_value = product.total_value();

      Ok(HttpResponse::Created().json(json!({
        "product": product,
        "draftRemoved": draft_retired,
        "totalValue": total_value,
        "totalValueDisplay": format_number(total_value),
      })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("create_product was halted by a step".to_string())),
  }
}

#[instrument(name = "handler::list_products", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_products_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list_products(auth_user.user_id).await?;
  info!(count = products.len(), "Products listed.");
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path, auth_user), fields(user_id = %auth_user.user_id, product_id = %path.as_ref()))]
pub async fn get_product_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.products.find_product(auth_user.user_id, product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!(%product_id, "Product not found for caller.");
      Err(AppError::NotFound(format!("Product {} not found.", product_id)))
    }
  }
}

#[instrument(name = "handler::update_product_status", skip(app_state, path, payload, auth_user), fields(user_id = %auth_user.user_id, product_id = %path.as_ref()))]
pub async fn update_product_status_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let UpdateStatusPayload { status } = read_json(payload).await?;

  match app_state
    .products
    .set_product_status(auth_user.user_id, product_id, status)
    .await?
  {
    Some(product) => {
      info!(%product_id, ?status, "Product status changed.");
      Ok(HttpResponse::Ok().json(json!({ "product": product })))
    }
    None => Err(AppError::NotFound(format!("Product {} not found.", product_id))),
  }
}
