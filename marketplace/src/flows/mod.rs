// furrow_market/src/flows/mod.rs

//! Request flows run through the `furrow` registry.

use crate::errors::AppError;
use furrow::Flows;

pub mod contexts;
pub mod draft_flows;
pub mod image_flow;
pub mod product_flow;

/// Registers every flow the HTTP handlers run. Called once at startup, and by
/// the test harness when it builds its own `AppState`.
pub fn register_all_flows(flows: &Flows<AppError>) {
  tracing::info!("Registering request flows...");

  draft_flows::register_create_draft_flow(flows);
  draft_flows::register_update_draft_flow(flows);
  image_flow::register_upload_images_flow(flows);
  product_flow::register_create_product_flow(flows);

  tracing::info!(flows = ?flows.flow_names(), "All request flows registered.");
}
