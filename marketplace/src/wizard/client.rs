// furrow_market/src/wizard/client.rs

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::{AppError, FieldError, Result};
use crate::models::{CreateProductPayload, DraftPayload, PendingImage, Product, ProductDraft, UploadedImage};
use crate::wizard::listing_wizard::ListingBackend;

/// HTTP client for the farmer API, authenticated with a session token.
#[derive(Clone)]
pub struct MarketplaceClient {
  http: reqwest::Client,
  base_url: String,
  session_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: Option<String>,
  #[serde(default)]
  details: Vec<FieldErrorBody>,
}

#[derive(Deserialize)]
struct FieldErrorBody {
  field: String,
  message: String,
}

#[derive(Deserialize)]
struct DraftEnvelope {
  draft: ProductDraft,
}

#[derive(Deserialize)]
struct DraftsEnvelope {
  drafts: Vec<ProductDraft>,
}

#[derive(Deserialize)]
struct ProductEnvelope {
  product: Product,
}

#[derive(Deserialize)]
struct ImagesEnvelope {
  images: Vec<UploadedImage>,
}

#[derive(Serialize)]
struct DraftUpdateBody<'a> {
  id: Uuid,
  #[serde(flatten)]
  draft: &'a DraftPayload,
}

fn transport(e: reqwest::Error) -> AppError {
  AppError::Api {
    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
    message: e.to_string(),
  }
}

/// Maps a non-2xx response onto the same taxonomy the server used.
async fn into_error(resp: Response) -> AppError {
  let status = resp.status();
  let body: Option<ErrorBody> = resp.json().await.ok();
  let message = body
    .as_ref()
    .and_then(|b| b.error.clone())
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

  match status {
    StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
    StatusCode::NOT_FOUND => AppError::NotFound(message),
    StatusCode::BAD_REQUEST => {
      let details: Vec<FieldError> = body
        .map(|b| b.details.into_iter().map(|d| FieldError::new(d.field, d.message)).collect())
        .unwrap_or_default();
      if details.is_empty() {
        AppError::invalid("body", message)
      } else {
        AppError::Validation(details)
      }
    }
    other => AppError::Api {
      status: other.as_u16(),
      message,
    },
  }
}

impl MarketplaceClient {
  pub fn new(http: reqwest::Client, base_url: impl Into<String>, session_token: impl Into<String>) -> Self {
    Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      session_token: session_token.into(),
    }
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self
      .http
      .request(method, format!("{}{}", self.base_url, path))
      .bearer_auth(&self.session_token)
  }

  async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
    let resp = builder.send().await.map_err(transport)?;
    if !resp.status().is_success() {
      return Err(into_error(resp).await);
    }
    resp.json::<T>().await.map_err(transport)
  }

  #[instrument(name = "client::list_drafts", skip(self))]
  pub async fn list_drafts(&self) -> Result<Vec<ProductDraft>> {
    let envelope: DraftsEnvelope = self.send(self.request(Method::GET, "/api/farmer/drafts")).await?;
    Ok(envelope.drafts)
  }

  #[instrument(name = "client::get_draft", skip(self))]
  pub async fn get_draft(&self, draft_id: Uuid) -> Result<ProductDraft> {
    let builder = self
      .request(Method::GET, "/api/farmer/drafts")
      .query(&[("id", draft_id.to_string())]);
    let envelope: DraftEnvelope = self.send(builder).await?;
    Ok(envelope.draft)
  }

  #[instrument(name = "client::delete_draft", skip(self))]
  pub async fn delete_draft(&self, draft_id: Uuid) -> Result<()> {
    let builder = self
      .request(Method::DELETE, "/api/farmer/drafts")
      .query(&[("id", draft_id.to_string())]);
    let _: serde_json::Value = self.send(builder).await?;
    Ok(())
  }

  /// Uploads a batch under the `images` multipart field.
  #[instrument(name = "client::upload_images", skip(self, files), fields(count = files.len()))]
  pub async fn upload_images(&self, files: Vec<PendingImage>) -> Result<Vec<UploadedImage>> {
    let mut form = reqwest::multipart::Form::new();
    for file in files {
      let part = reqwest::multipart::Part::bytes(file.bytes)
        .file_name(file.filename)
        .mime_str(&file.mime_type)
        .map_err(transport)?;
      form = form.part("images", part);
    }
    let envelope: ImagesEnvelope = self
      .send(self.request(Method::POST, "/api/farmer/products/images").multipart(form))
      .await?;
    Ok(envelope.images)
  }

  #[instrument(name = "client::delete_image", skip(self))]
  pub async fn delete_image(&self, key: &str) -> Result<()> {
    let builder = self
      .request(Method::DELETE, "/api/farmer/products/images")
      .query(&[("key", key)]);
    let _: serde_json::Value = self.send(builder).await?;
    Ok(())
  }
}

#[async_trait]
impl ListingBackend for MarketplaceClient {
  #[instrument(name = "client::save_draft", skip(self, draft))]
  async fn save_draft(&self, draft_id: Option<Uuid>, draft: &DraftPayload) -> Result<ProductDraft> {
    let builder = match draft_id {
      None => self.request(Method::POST, "/api/farmer/drafts").json(draft),
      Some(id) => self
        .request(Method::PUT, "/api/farmer/drafts")
        .json(&DraftUpdateBody { id, draft }),
    };
    let envelope: DraftEnvelope = self.send(builder).await?;
    debug!(draft_id = %envelope.draft.id, "Draft stored remotely.");
    Ok(envelope.draft)
  }

  #[instrument(name = "client::submit_listing", skip(self, listing), fields(draft_id = ?listing.draft_id))]
  async fn submit_listing(&self, listing: &CreateProductPayload) -> Result<Product> {
    let envelope: ProductEnvelope = self
      .send(self.request(Method::POST, "/api/farmer/products").json(listing))
      .await?;
    Ok(envelope.product)
  }
}
