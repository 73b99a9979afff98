// furrow_market/src/services/auth_service.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Turns a session token into the user id it belongs to.
#[async_trait]
pub trait SessionResolver: Send + Sync {
  /// `Ok(None)` for an unknown, expired, or revoked token.
  async fn resolve(&self, token: &str) -> Result<Option<Uuid>>;
}

#[derive(Debug, Deserialize)]
struct AuthUser {
  id: Uuid,
}

/// Resolves sessions against the hosted auth provider's `/auth/v1/user`.
#[derive(Clone)]
pub struct HostedAuthClient {
  http: reqwest::Client,
  base_url: String,
  anon_key: String,
}

impl HostedAuthClient {
  pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
    Self {
      http,
      base_url: config.backend_url.clone(),
      anon_key: config.backend_anon_key.clone(),
    }
  }
}

#[async_trait]
impl SessionResolver for HostedAuthClient {
  #[instrument(name = "auth::resolve_session", skip_all)]
  async fn resolve(&self, token: &str) -> Result<Option<Uuid>> {
    let endpoint = format!("{}/auth/v1/user", self.base_url);
    let resp = self
      .http
      .get(&endpoint)
      .header("Authorization", format!("Bearer {}", token))
      .header("apikey", &self.anon_key)
      .send()
      .await
      .map_err(|e| AppError::AuthProvider(format!("session lookup failed: {}", e)))?;

    match resp.status() {
      status if status.is_success() => {
        let user: AuthUser = resp
          .json()
          .await
          .map_err(|e| AppError::AuthProvider(format!("unexpected user payload: {}", e)))?;
        debug!(user_id = %user.id, "Session resolved.");
        Ok(Some(user.id))
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        debug!("Session token rejected by auth provider.");
        Ok(None)
      }
      status => {
        let body = resp.text().await.unwrap_or_default();
        warn!(%status, "Auth provider returned an unexpected status.");
        Err(AppError::AuthProvider(format!("{} - {}", status, body)))
      }
    }
  }
}
