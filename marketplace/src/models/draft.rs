// furrow_market/src/models/draft.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::listing::ListingFields;

/// A partially filled listing, saved from the wizard and keyed by its farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
  pub id: Uuid,
  pub farmer_id: Uuid,
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub fields: ListingFields,
  pub current_step: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
