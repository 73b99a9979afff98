// furrow_market/src/db/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{DraftStore, HealthCheck, ProductStore};
use crate::errors::{AppError, Result};
use crate::models::{DraftPayload, NewProduct, Product, ProductDraft, ProductStatus};

const DRAFT_COLUMNS: &str = "id, farmer_id, title, crop_type, variety, organic, quality_grade, quantity_available, \
  unit, price_per_unit, minimum_order_quantity, harvest_date, available_from, available_until, storage_method, \
  description, location, certifications, images, current_step, created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, farmer_id, title, crop_type, variety, organic, quality_grade, quantity_available, \
  unit, price_per_unit, minimum_order_quantity, harvest_date, available_from, available_until, storage_method, \
  description, location, certifications, images, status, created_at, updated_at";

/// Runtime-checked queries against the `product_drafts` and `products` tables.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(config: &AppConfig) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.database_max_connections)
      .connect(&config.database_url)
      .await?;
    Ok(Self::new(pool))
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

fn log_db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
  move |e| {
    error!(%operation, error = %e, "Database operation failed.");
    AppError::Database(e)
  }
}

#[async_trait]
impl DraftStore for PgStore {
  #[instrument(name = "db::insert_draft", skip(self, draft))]
  async fn insert_draft(&self, farmer_id: Uuid, draft: &DraftPayload) -> Result<ProductDraft> {
    let f = &draft.fields;
    let sql = format!(
      "INSERT INTO product_drafts (farmer_id, title, crop_type, variety, organic, quality_grade, quantity_available, \
       unit, price_per_unit, minimum_order_quantity, harvest_date, available_from, available_until, storage_method, \
       description, location, certifications, images, current_step) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
       RETURNING {}",
      DRAFT_COLUMNS
    );
    sqlx::query_as::<_, ProductDraft>(&sql)
      .bind(farmer_id)
      .bind(&f.title)
      .bind(&f.crop_type)
      .bind(&f.variety)
      .bind(f.organic)
      .bind(&f.quality_grade)
      .bind(f.quantity_available)
      .bind(&f.unit)
      .bind(f.price_per_unit)
      .bind(f.minimum_order_quantity)
      .bind(f.harvest_date)
      .bind(f.available_from)
      .bind(f.available_until)
      .bind(&f.storage_method)
      .bind(&f.description)
      .bind(&f.location)
      .bind(&f.certifications)
      .bind(&f.images)
      .bind(&draft.current_step)
      .fetch_one(&self.pool)
      .await
      .map_err(log_db_error("insert_draft"))
  }

  #[instrument(name = "db::find_draft", skip(self))]
  async fn find_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<Option<ProductDraft>> {
    let sql = format!("SELECT {} FROM product_drafts WHERE id = $1 AND farmer_id = $2", DRAFT_COLUMNS);
    sqlx::query_as::<_, ProductDraft>(&sql)
      .bind(draft_id)
      .bind(farmer_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(log_db_error("find_draft"))
  }

  #[instrument(name = "db::list_drafts", skip(self))]
  async fn list_drafts(&self, farmer_id: Uuid) -> Result<Vec<ProductDraft>> {
    let sql = format!(
      "SELECT {} FROM product_drafts WHERE farmer_id = $1 ORDER BY updated_at DESC",
      DRAFT_COLUMNS
    );
    sqlx::query_as::<_, ProductDraft>(&sql)
      .bind(farmer_id)
      .fetch_all(&self.pool)
      .await
      .map_err(log_db_error("list_drafts"))
  }

  #[instrument(name = "db::update_draft", skip(self, draft))]
  async fn update_draft(&self, farmer_id: Uuid, draft_id: Uuid, draft: &DraftPayload) -> Result<Option<ProductDraft>> {
    let f = &draft.fields;
    let sql = format!(
      "UPDATE product_drafts SET title = $3, crop_type = $4, variety = $5, organic = $6, quality_grade = $7, \
       quantity_available = $8, unit = $9, price_per_unit = $10, minimum_order_quantity = $11, harvest_date = $12, \
       available_from = $13, available_until = $14, storage_method = $15, description = $16, location = $17, \
       certifications = $18, images = $19, current_step = $20, updated_at = NOW() \
       WHERE id = $1 AND farmer_id = $2 RETURNING {}",
      DRAFT_COLUMNS
    );
    sqlx::query_as::<_, ProductDraft>(&sql)
      .bind(draft_id)
      .bind(farmer_id)
      .bind(&f.title)
      .bind(&f.crop_type)
      .bind(&f.variety)
      .bind(f.organic)
      .bind(&f.quality_grade)
      .bind(f.quantity_available)
      .bind(&f.unit)
      .bind(f.price_per_unit)
      .bind(f.minimum_order_quantity)
      .bind(f.harvest_date)
      .bind(f.available_from)
      .bind(f.available_until)
      .bind(&f.storage_method)
      .bind(&f.description)
      .bind(&f.location)
      .bind(&f.certifications)
      .bind(&f.images)
      .bind(&draft.current_step)
      .fetch_optional(&self.pool)
      .await
      .map_err(log_db_error("update_draft"))
  }

  #[instrument(name = "db::delete_draft", skip(self))]
  async fn delete_draft(&self, farmer_id: Uuid, draft_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM product_drafts WHERE id = $1 AND farmer_id = $2")
      .bind(draft_id)
      .bind(farmer_id)
      .execute(&self.pool)
      .await
      .map_err(log_db_error("delete_draft"))?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "db::count_drafts", skip(self))]
  async fn count_drafts(&self, farmer_id: Uuid) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_drafts WHERE farmer_id = $1")
      .bind(farmer_id)
      .fetch_one(&self.pool)
      .await
      .map_err(log_db_error("count_drafts"))
  }
}

#[async_trait]
impl ProductStore for PgStore {
  #[instrument(name = "db::insert_product", skip(self, product), fields(farmer_id = %product.farmer_id))]
  async fn insert_product(&self, product: &NewProduct) -> Result<Product> {
    let sql = format!(
      "INSERT INTO products (farmer_id, title, crop_type, variety, organic, quality_grade, quantity_available, unit, \
       price_per_unit, minimum_order_quantity, harvest_date, available_from, available_until, storage_method, \
       description, location, certifications, images, status) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
       RETURNING {}",
      PRODUCT_COLUMNS
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(product.farmer_id)
      .bind(&product.title)
      .bind(&product.crop_type)
      .bind(&product.variety)
      .bind(product.organic)
      .bind(&product.quality_grade)
      .bind(product.quantity_available)
      .bind(&product.unit)
      .bind(product.price_per_unit)
      .bind(product.minimum_order_quantity)
      .bind(product.harvest_date)
      .bind(product.available_from)
      .bind(product.available_until)
      .bind(&product.storage_method)
      .bind(&product.description)
      .bind(&product.location)
      .bind(&product.certifications)
      .bind(&product.images)
      .bind(ProductStatus::Active)
      .fetch_one(&self.pool)
      .await
      .map_err(log_db_error("insert_product"))
  }

  #[instrument(name = "db::find_product", skip(self))]
  async fn find_product(&self, farmer_id: Uuid, product_id: Uuid) -> Result<Option<Product>> {
    let sql = format!("SELECT {} FROM products WHERE id = $1 AND farmer_id = $2", PRODUCT_COLUMNS);
    sqlx::query_as::<_, Product>(&sql)
      .bind(product_id)
      .bind(farmer_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(log_db_error("find_product"))
  }

  #[instrument(name = "db::list_products", skip(self))]
  async fn list_products(&self, farmer_id: Uuid) -> Result<Vec<Product>> {
    let sql = format!(
      "SELECT {} FROM products WHERE farmer_id = $1 ORDER BY created_at DESC",
      PRODUCT_COLUMNS
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(farmer_id)
      .fetch_all(&self.pool)
      .await
      .map_err(log_db_error("list_products"))
  }

  #[instrument(name = "db::set_product_status", skip(self))]
  async fn set_product_status(
    &self,
    farmer_id: Uuid,
    product_id: Uuid,
    status: ProductStatus,
  ) -> Result<Option<Product>> {
    let sql = format!(
      "UPDATE products SET status = $3, updated_at = NOW() WHERE id = $1 AND farmer_id = $2 RETURNING {}",
      PRODUCT_COLUMNS
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(product_id)
      .bind(farmer_id)
      .bind(status)
      .fetch_optional(&self.pool)
      .await
      .map_err(log_db_error("set_product_status"))
  }
}

#[async_trait]
impl HealthCheck for PgStore {
  #[instrument(name = "db::ping", skip(self))]
  async fn ping(&self) -> Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
      .fetch_one(&self.pool)
      .await
      .map_err(log_db_error("ping"))?;
    Ok(())
  }
}
