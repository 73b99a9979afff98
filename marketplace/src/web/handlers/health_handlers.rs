// furrow_market/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Unauthenticated database round trip.
#[instrument(name = "handler::connectivity_probe", skip(app_state))]
pub async fn connectivity_probe_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  app_state.health.ping().await.map_err(|e| {
    error!(error = %e, "Connectivity probe failed.");
    e
  })?;
  Ok(HttpResponse::Ok().json(json!({ "status": "ok", "database": "connected" })))
}
