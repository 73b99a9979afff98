// furrow_market/src/state.rs
use crate::config::AppConfig;
use crate::db::{DraftStore, HealthCheck, PgStore, ProductStore};
use crate::errors::AppError;
use crate::services::{HostedAuthClient, HostedStorageClient, ObjectStorage, SessionResolver};
use furrow::Flows;
use std::sync::Arc;

/// Immutable per-process handles shared by every request.
#[derive(Clone)]
pub struct AppState {
  pub drafts: Arc<dyn DraftStore>,
  pub products: Arc<dyn ProductStore>,
  pub health: Arc<dyn HealthCheck>,
  pub storage: Arc<dyn ObjectStorage>,
  pub sessions: Arc<dyn SessionResolver>,
  pub flows: Arc<Flows<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the Postgres store and the hosted auth/storage clients.
  pub fn hosted(store: PgStore, http: reqwest::Client, config: Arc<AppConfig>) -> Self {
    let store = Arc::new(store);
    Self {
      drafts: store.clone(),
      products: store.clone(),
      health: store,
      storage: Arc::new(HostedStorageClient::new(http.clone(), &config)),
      sessions: Arc::new(HostedAuthClient::new(http, &config)),
      flows: Arc::new(Flows::new()),
      config,
    }
  }
}
