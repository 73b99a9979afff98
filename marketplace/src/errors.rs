// furrow_market/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use furrow::FlowError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication required: {0}")]
  Unauthorized(String),

  #[error("Validation failed on {} field(s)", .0.len())]
  Validation(Vec<FieldError>),

  #[error("Resource not found: {0}")]
  NotFound(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Object storage error: {0}")]
  Storage(String),

  #[error("Auth provider error: {0}")]
  AuthProvider(String),

  /// A call made by the listing wizard's client against the marketplace API failed.
  #[error("Marketplace API error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Flow error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal server error: {0}")]
  Internal(String),
}

impl AppError {
  /// Single-field validation failure.
  pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
    AppError::Validation(vec![FieldError::new(field, message)])
  }

  /// Per-field details when this is a validation failure, otherwise empty.
  pub fn field_errors(&self) -> &[FieldError] {
    match self {
      AppError::Validation(details) => details,
      _ => &[],
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Database(sqlx_err),
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl From<validator::ValidationErrors> for AppError {
  fn from(errors: validator::ValidationErrors) -> Self {
    AppError::Validation(crate::models::validation::field_errors(&errors))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Unauthorized(m) => {
        tracing::warn!(application_error = %self, "Rejecting unauthenticated request");
        HttpResponse::Unauthorized().json(json!({"error": m}))
      }
      AppError::Validation(details) => {
        tracing::warn!(application_error = %self, ?details, "Rejecting invalid request");
        HttpResponse::BadRequest().json(json!({"error": "Validation failed", "details": details}))
      }
      AppError::NotFound(m) => {
        tracing::warn!(application_error = %self, "Responding with not found");
        HttpResponse::NotFound().json(json!({"error": m}))
      }
      AppError::Flow { source } => {
        tracing::error!(flow_error_source = ?source, "Flow error details");
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred"}))
      }
      _ => {
        // Backend detail stays in the logs.
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred"}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
