// furrow_market/tests/common/mod.rs
#![allow(dead_code, unused_macros)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use furrow::Flows;
use furrow_market::config::{AppConfig, ImageLimits};
use furrow_market::db::{DraftStore, HealthCheck, ProductStore};
use furrow_market::errors::{AppError, Result};
use furrow_market::flows::register_all_flows;
use furrow_market::models::{
  DraftPayload, ListingFields, NewProduct, Product, ProductDraft, ProductStatus,
};
use furrow_market::services::{ObjectStorage, SessionResolver};
use furrow_market::state::AppState;

pub const FARMER_A_TOKEN: &str = "token-farmer-a";
pub const FARMER_B_TOKEN: &str = "token-farmer-b";
pub static FARMER_A: Lazy<Uuid> = Lazy::new(Uuid::new_v4);
pub static FARMER_B: Lazy<Uuid> = Lazy::new(Uuid::new_v4);

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

// --- Stores ---

#[derive(Default)]
pub struct InMemoryStore {
  pub drafts: Mutex<Vec<ProductDraft>>,
  pub products: Mutex<Vec<Product>>,
  pub database_down: AtomicBool,
  clock: AtomicUsize,
}

impl InMemoryStore {
  /// Strictly increasing timestamps so "most recent first" is deterministic.
  fn tick(&self) -> chrono::DateTime<Utc> {
    let n = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
    Utc::now() + Duration::milliseconds(n)
  }

  fn check_up(&self) -> Result<()> {
    if self.database_down.load(Ordering::SeqCst) {
      return Err(AppError::Database(sqlx::Error::PoolTimedOut));
    }
    Ok(())
  }

  pub fn draft_count(&self) -> usize {
    self.drafts.lock().len()
  }

  pub fn seed_draft(&self, farmer_id: Uuid, title: &str) -> ProductDraft {
    let now = self.tick();
    let draft = ProductDraft {
      id: Uuid::new_v4(),
      farmer_id,
      fields: ListingFields {
        title: Some(title.to_string()),
        crop_type: Some("maize".to_string()),
        ..Default::default()
      },
      current_step: Some("basic-info".to_string()),
      created_at: now,
      updated_at: now,
    };
    self.drafts.lock().push(draft.clone());
    draft
  }
}

#[async_trait]
impl DraftStore for InMemoryStore {
  async fn insert_draft(&self, farmer_id: Uuid, draft: &DraftPayload) -> Result<ProductDraft> {
    self.check_up()?;
    let now = self.tick();
    let row = ProductDraft {
      id: Uuid::new_v4(),
      farmer_id,
      fields: draft.fields.clone(),
      current_step: draft.current_step.clone(),
      created_at: now,
      updated_at: now,
    };
    self.drafts.lock().push(row.clone());
    Ok(row)
  }

  async fn find_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<Option<ProductDraft>> {
    self.check_up()?;
    Ok(
      self
        .drafts
        .lock()
        .iter()
        .find(|d| d.id == draft_id && d.farmer_id == farmer_id)
        .cloned(),
    )
  }

  async fn list_drafts(&self, farmer_id: Uuid) -> Result<Vec<ProductDraft>> {
    self.check_up()?;
    let mut rows: Vec<ProductDraft> = self
      .drafts
      .lock()
      .iter()
      .filter(|d| d.farmer_id == farmer_id)
      .cloned()
      .collect();
    rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(rows)
  }

  async fn update_draft(&self, farmer_id: Uuid, draft_id: Uuid, draft: &DraftPayload) -> Result<Option<ProductDraft>> {
    self.check_up()?;
    let now = self.tick();
    let mut drafts = self.drafts.lock();
    let Some(row) = drafts.iter_mut().find(|d| d.id == draft_id && d.farmer_id == farmer_id) else {
      return Ok(None);
    };
    row.fields = draft.fields.clone();
    row.current_step = draft.current_step.clone();
    row.updated_at = now;
    Ok(Some(row.clone()))
  }

  async fn delete_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<bool> {
    self.check_up()?;
    let mut drafts = self.drafts.lock();
    let before = drafts.len();
    drafts.retain(|d| !(d.id == draft_id && d.farmer_id == farmer_id));
    Ok(drafts.len() < before)
  }

  async fn count_drafts(&self, farmer_id: Uuid) -> Result<i64> {
    self.check_up()?;
    Ok(self.drafts.lock().iter().filter(|d| d.farmer_id == farmer_id).count() as i64)
  }
}

#[async_trait]
impl ProductStore for InMemoryStore {
  async fn insert_product(&self, product: &NewProduct) -> Result<Product> {
    self.check_up()?;
    let now = self.tick();
    let row = Product {
      id: Uuid::new_v4(),
      farmer_id: product.farmer_id,
      title: product.title.clone(),
      crop_type: product.crop_type.clone(),
      variety: product.variety.clone(),
      organic: product.organic,
      quality_grade: product.quality_grade.clone(),
      quantity_available: product.quantity_available,
      unit: product.unit.clone(),
      price_per_unit: product.price_per_unit,
      minimum_order_quantity: product.minimum_order_quantity,
      harvest_date: product.harvest_date,
      available_from: product.available_from,
      available_until: product.available_until,
      storage_method: product.storage_method.clone(),
      description: product.description.clone(),
      location: product.location.clone(),
      certifications: product.certifications.clone(),
      images: product.images.clone(),
      status: ProductStatus::Active,
      created_at: now,
      updated_at: now,
    };
    self.products.lock().push(row.clone());
    Ok(row)
  }

  async fn find_product(&self, farmer_id: Uuid, product_id: Uuid) -> Result<Option<Product>> {
    self.check_up()?;
    Ok(
      self
        .products
        .lock()
        .iter()
        .find(|p| p.id == product_id && p.farmer_id == farmer_id)
        .cloned(),
    )
  }

  async fn list_products(&self, farmer_id: Uuid) -> Result<Vec<Product>> {
    self.check_up()?;
    let mut rows: Vec<Product> = self
      .products
      .lock()
      .iter()
      .filter(|p| p.farmer_id == farmer_id)
      .cloned()
      .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(rows)
  }

  async fn set_product_status(
    &self,
    farmer_id: Uuid,
    product_id: Uuid,
    status: ProductStatus,
  ) -> Result<Option<Product>> {
    self.check_up()?;
    let now = self.tick();
    let mut products = self.products.lock();
    let Some(row) = products.iter_mut().find(|p| p.id == product_id && p.farmer_id == farmer_id) else {
      return Ok(None);
    };
    row.status = status;
    row.updated_at = now;
    Ok(Some(row.clone()))
  }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
  async fn ping(&self) -> Result<()> {
    self.check_up()
  }
}

// --- Object storage ---

#[derive(Default)]
pub struct InMemoryStorage {
  pub objects: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
  pub put_calls: AtomicUsize,
  /// Fails the n-th put (zero based) when set.
  pub fail_put_at: Mutex<Option<usize>>,
}

impl InMemoryStorage {
  pub fn keys(&self) -> Vec<String> {
    self.objects.lock().keys().cloned().collect()
  }

  pub fn insert(&self, key: &str) {
    self
      .objects
      .lock()
      .insert(key.to_string(), (vec![1, 2, 3], "image/png".to_string()));
  }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
  async fn put_object(&self, key: &str, bytes: Vec<u8>, mime_type: &str) -> Result<()> {
    let call = self.put_calls.fetch_add(1, Ordering::SeqCst);
    if *self.fail_put_at.lock() == Some(call) {
      return Err(AppError::Storage("simulated storage outage".to_string()));
    }
    self
      .objects
      .lock()
      .insert(key.to_string(), (bytes, mime_type.to_string()));
    Ok(())
  }

  async fn delete_object(&self, key: &str) -> Result<()> {
    match self.objects.lock().remove(key) {
      Some(_) => Ok(()),
      None => Err(AppError::NotFound(format!("Image '{}' not found.", key))),
    }
  }

  fn public_url(&self, key: &str) -> String {
    format!("https://storage.test/public/product-images/{}", key)
  }
}

// --- Sessions ---

pub struct StaticSessions {
  tokens: HashMap<String, Uuid>,
  latency: Option<std::time::Duration>,
}

impl StaticSessions {
  pub fn two_farmers() -> Self {
    let mut tokens = HashMap::new();
    tokens.insert(FARMER_A_TOKEN.to_string(), *FARMER_A);
    tokens.insert(FARMER_B_TOKEN.to_string(), *FARMER_B);
    Self { tokens, latency: None }
  }

  /// Answers only after `latency`, like a round trip to the auth provider.
  pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
    self.latency = Some(latency);
    self
  }
}

#[async_trait]
impl SessionResolver for StaticSessions {
  async fn resolve(&self, token: &str) -> Result<Option<Uuid>> {
    if let Some(latency) = self.latency {
      tokio::time::sleep(latency).await;
    }
    Ok(self.tokens.get(token).copied())
  }
}

// --- App state ---

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://unused".to_string(),
    database_max_connections: 1,
    backend_url: "https://backend.test".to_string(),
    backend_anon_key: "anon".to_string(),
    backend_service_key: "service".to_string(),
    storage_bucket: "product-images".to_string(),
    session_cookie_name: "sb-access-token".to_string(),
    images: ImageLimits {
      max_bytes: 1024,
      max_files: 3,
      ..ImageLimits::default()
    },
  }
}

pub struct TestHarness {
  pub state: AppState,
  pub store: Arc<InMemoryStore>,
  pub storage: Arc<InMemoryStorage>,
}

pub fn harness() -> TestHarness {
  setup_tracing();
  let store = Arc::new(InMemoryStore::default());
  let storage = Arc::new(InMemoryStorage::default());
  let flows = Arc::new(Flows::<AppError>::new());
  register_all_flows(&flows);

  let state = AppState {
    drafts: store.clone(),
    products: store.clone(),
    health: store.clone(),
    storage: storage.clone(),
    sessions: Arc::new(StaticSessions::two_farmers()),
    flows,
    config: Arc::new(test_config()),
  };
  TestHarness { state, store, storage }
}

/// Builds an actix test service over the harness state.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(furrow_market::web::configure_app_routes),
    )
    .await
  };
}

pub fn bearer(token: &str) -> (&'static str, String) {
  ("Authorization", format!("Bearer {}", token))
}

pub fn complete_listing_json() -> serde_json::Value {
  serde_json::json!({
    "title": "Sweet maize",
    "cropType": "maize",
    "variety": "Hybrid 614",
    "organic": true,
    "qualityGrade": "grade_a",
    "quantityAvailable": 100.0,
    "unit": "bag",
    "pricePerUnit": 50000.0,
    "harvestDate": "2026-03-14",
    "location": "Nakuru",
    "certifications": ["KEBS"],
    "images": ["https://storage.test/public/product-images/a.jpg"]
  })
}

pub fn harvest_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default()
}

/// Multipart body with each file under the `images` field.
pub fn multipart_body(files: &[(&str, &str, Vec<u8>)]) -> (String, Vec<u8>) {
  let boundary = "furrow-test-boundary";
  let mut body = Vec::new();
  for (filename, mime, bytes) in files {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
      format!(
        "Content-Disposition: form-data; name=\"images\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        filename, mime
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
  (format!("multipart/form-data; boundary={}", boundary), body)
}
