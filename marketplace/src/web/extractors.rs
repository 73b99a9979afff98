// furrow_market/src/web/extractors.rs

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The farmer behind the request, resolved from the session cookie or an
/// `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

/// Session cookie first, then the bearer header.
pub fn session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
  if let Some(cookie) = req.cookie(cookie_name) {
    let value = cookie.value().trim();
    if !value.is_empty() {
      return Some(value.to_string());
    }
  }
  let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let token = header.strip_prefix("Bearer ").or_else(|| header.strip_prefix("bearer "))?;
  let token = token.trim();
  (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = state
      .as_ref()
      .and_then(|s| session_token(req, &s.config.session_cookie_name));

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("application state is not configured".to_string()))?;
      let Some(token) = token else {
        debug!("Request carries no session token.");
        return Err(AppError::Unauthorized("Sign in to continue.".to_string()));
      };

      match state.sessions.resolve(&token).await? {
        Some(user_id) => Ok(AuthenticatedUser { user_id }),
        None => Err(AppError::Unauthorized("Session is invalid or expired.".to_string())),
      }
    })
  }
}

/// Upper bound on a JSON request body.
pub const MAX_JSON_BODY: usize = 256 * 1024;

// Handlers take the raw body and query and parse them only after
// `AuthenticatedUser` resolved, so a malformed request without a valid session
// still answers 401.

/// Reads the whole body and parses it as `T`.
pub async fn read_json<T: DeserializeOwned>(mut payload: web::Payload) -> Result<T, AppError> {
  let mut body = web::BytesMut::new();
  while let Some(chunk) = payload.next().await {
    let chunk = chunk.map_err(|e| AppError::invalid("body", format!("could not read request body: {}", e)))?;
    if body.len() + chunk.len() > MAX_JSON_BODY {
      return Err(AppError::invalid(
        "body",
        format!("request body exceeds {} bytes", MAX_JSON_BODY),
      ));
    }
    body.extend_from_slice(&chunk);
  }
  serde_json::from_slice(&body).map_err(|e| AppError::invalid("body", format!("invalid JSON body: {}", e)))
}

pub fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> Result<T, AppError> {
  web::Query::<T>::from_query(req.query_string())
    .map(web::Query::into_inner)
    .map_err(|e| AppError::invalid("query", format!("invalid query string: {}", e)))
}
