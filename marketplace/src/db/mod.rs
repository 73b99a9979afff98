// furrow_market/src/db/mod.rs

//! Persistence seams. Every query is scoped by the owning farmer's id; a row
//! belonging to someone else behaves exactly like a missing row.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{DraftPayload, NewProduct, Product, ProductDraft, ProductStatus};

pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait DraftStore: Send + Sync {
  async fn insert_draft(&self, farmer_id: Uuid, draft: &DraftPayload) -> Result<ProductDraft>;

  async fn find_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<Option<ProductDraft>>;

  /// Most recently updated first.
  async fn list_drafts(&self, farmer_id: Uuid) -> Result<Vec<ProductDraft>>;

  /// Replaces the listing fields of an owned draft. `None` when no owned row matches.
  async fn update_draft(&self, farmer_id: Uuid, draft_id: Uuid, draft: &DraftPayload) -> Result<Option<ProductDraft>>;

  /// `false` when no owned row matches; other farmers' rows are never touched.
  async fn delete_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<bool>;

  async fn count_drafts(&self, farmer_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
  async fn insert_product(&self, product: &NewProduct) -> Result<Product>;

  async fn find_product(&self, farmer_id: Uuid, product_id: Uuid) -> Result<Option<Product>>;

  /// Newest first.
  async fn list_products(&self, farmer_id: Uuid) -> Result<Vec<Product>>;

  async fn set_product_status(
    &self,
    farmer_id: Uuid,
    product_id: Uuid,
    status: ProductStatus,
  ) -> Result<Option<Product>>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
  async fn ping(&self) -> Result<()>;
}
