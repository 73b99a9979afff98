// furrow_market/src/web/handlers/dashboard_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::format::format_number;
use crate::models::{Product, ProductStatus};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
  pub active_listings: usize,
  pub inactive_listings: usize,
  pub drafts: i64,
  /// Σ quantity × price over active listings.
  pub inventory_value: f64,
  pub inventory_value_display: String,
}

impl DashboardSummary {
  pub fn from_products(products: &[Product], drafts: i64) -> Self {
    let active: Vec<&Product> = products.iter().filter(|p| p.status == ProductStatus::Active).collect();
    let inventory_value: f64 = active.iter().map(|p| p.total_value()).sum();
    Self {
      active_listings: active.len(),
      inactive_listings: products.len() - active.len(),
      drafts,
      inventory_value,
      inventory_value_display: format_number(inventory_value),
    }
  }
}

#[instrument(name = "handler::dashboard", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn dashboard_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let (products, drafts) = tokio::try_join!(
    app_state.products.list_products(auth_user.user_id),
    app_state.drafts.count_drafts(auth_user.user_id),
  )?;
  Ok(HttpResponse::Ok().json(DashboardSummary::from_products(&products, drafts)))
}
