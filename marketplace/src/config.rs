// furrow_market/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  // Hosted auth/storage provider
  pub backend_url: String,
  pub backend_anon_key: String,
  pub backend_service_key: String,
  pub storage_bucket: String,
  pub session_cookie_name: String,

  pub images: ImageLimits,
}

/// Upload rules applied to every image batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLimits {
  pub max_bytes: usize,
  pub max_files: usize,
  pub allowed_types: Vec<String>,
}

impl Default for ImageLimits {
  fn default() -> Self {
    Self {
      max_bytes: 5 * 1024 * 1024,
      max_files: 10,
      allowed_types: vec!["image/jpeg".to_string(), "image/png".to_string(), "image/webp".to_string()],
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = get_env("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let backend_url = get_env("BACKEND_URL")?.trim_end_matches('/').to_string();
    let backend_anon_key = get_env("BACKEND_ANON_KEY")?;
    let backend_service_key = get_env("BACKEND_SERVICE_KEY")?;
    let storage_bucket = get_env("STORAGE_BUCKET").unwrap_or_else(|_| "product-images".to_string());
    let session_cookie_name = get_env("SESSION_COOKIE_NAME").unwrap_or_else(|_| "sb-access-token".to_string());

    let defaults = ImageLimits::default();
    let max_bytes = match get_env("MAX_IMAGE_BYTES") {
      Ok(raw) => parse_positive("MAX_IMAGE_BYTES", &raw)?,
      Err(_) => defaults.max_bytes,
    };
    let max_files = match get_env("MAX_IMAGES_PER_UPLOAD") {
      Ok(raw) => parse_positive("MAX_IMAGES_PER_UPLOAD", &raw)?,
      Err(_) => defaults.max_files,
    };
    let allowed_types = match get_env("ALLOWED_IMAGE_TYPES") {
      Ok(raw) => parse_mime_list(&raw)?,
      Err(_) => defaults.allowed_types,
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      backend_url,
      backend_anon_key,
      backend_service_key,
      storage_bucket,
      session_cookie_name,
      images: ImageLimits {
        max_bytes,
        max_files,
        allowed_types,
      },
    })
  }
}

fn parse_positive(var_name: &str, raw: &str) -> Result<usize> {
  match raw.trim().parse::<usize>() {
    Ok(0) => Err(AppError::Config(format!("{} must be greater than zero", var_name))),
    Ok(n) => Ok(n),
    Err(e) => Err(AppError::Config(format!("Invalid {}: {}", var_name, e))),
  }
}

fn parse_mime_list(raw: &str) -> Result<Vec<String>> {
  let types: Vec<String> = raw
    .split(',')
    .map(|t| t.trim().to_ascii_lowercase())
    .filter(|t| !t.is_empty())
    .collect();
  if types.is_empty() {
    return Err(AppError::Config("ALLOWED_IMAGE_TYPES must name at least one mime type".to_string()));
  }
  if let Some(bad) = types.iter().find(|t| !t.starts_with("image/")) {
    return Err(AppError::Config(format!("ALLOWED_IMAGE_TYPES entry '{}' is not an image type", bad)));
  }
  Ok(types)
}
