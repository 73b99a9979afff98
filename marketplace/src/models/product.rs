// furrow_market/src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::listing::ListingFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
  Active,
  Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub farmer_id: Uuid,
  pub title: String,
  pub crop_type: String,
  pub variety: Option<String>,
  pub organic: bool,
  pub quality_grade: String,
  pub quantity_available: f64,
  pub unit: String,
  pub price_per_unit: f64,
  pub minimum_order_quantity: Option<f64>,
  pub harvest_date: NaiveDate,
  pub available_from: Option<NaiveDate>,
  pub available_until: Option<NaiveDate>,
  pub storage_method: Option<String>,
  pub description: Option<String>,
  pub location: String,
  pub certifications: Vec<String>,
  pub images: Vec<String>,
  pub status: ProductStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn total_value(&self) -> f64 {
    crate::format::total_value(self.quantity_available, self.price_per_unit)
  }
}

/// A validated listing ready to be inserted as an active product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub farmer_id: Uuid,
  pub title: String,
  pub crop_type: String,
  pub variety: Option<String>,
  pub organic: bool,
  pub quality_grade: String,
  pub quantity_available: f64,
  pub unit: String,
  pub price_per_unit: f64,
  pub minimum_order_quantity: Option<f64>,
  pub harvest_date: NaiveDate,
  pub available_from: Option<NaiveDate>,
  pub available_until: Option<NaiveDate>,
  pub storage_method: Option<String>,
  pub description: Option<String>,
  pub location: String,
  pub certifications: Vec<String>,
  pub images: Vec<String>,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
  value.ok_or_else(|| AppError::invalid(field, "is required"))
}

fn trimmed(value: Option<String>) -> Option<String> {
  value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl NewProduct {
  /// Builds the insert row from listing fields that already passed the
  /// product schema.
  pub fn from_listing(farmer_id: Uuid, fields: ListingFields) -> Result<Self> {
    Ok(Self {
      farmer_id,
      title: require(trimmed(fields.title), "title")?,
      crop_type: require(trimmed(fields.crop_type), "cropType")?,
      variety: trimmed(fields.variety),
      organic: fields.organic.unwrap_or(false),
      quality_grade: require(fields.quality_grade, "qualityGrade")?,
      quantity_available: require(fields.quantity_available, "quantityAvailable")?,
      unit: require(fields.unit, "unit")?,
      price_per_unit: require(fields.price_per_unit, "pricePerUnit")?,
      minimum_order_quantity: fields.minimum_order_quantity,
      harvest_date: require(fields.harvest_date, "harvestDate")?,
      available_from: fields.available_from,
      available_until: fields.available_until,
      storage_method: trimmed(fields.storage_method),
      description: trimmed(fields.description),
      location: require(trimmed(fields.location), "location")?,
      certifications: fields
        .certifications
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect(),
      images: fields.images.unwrap_or_default(),
    })
  }
}
