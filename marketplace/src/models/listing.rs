// furrow_market/src/models/listing.rs

//! Listing fields shared by drafts, product submissions, and the listing wizard.
//!
//! Every field is optional at this level. Which ones are required depends on
//! where the fields are going: a draft only needs a title and a crop type, a
//! product needs everything the wizard gates on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, Result};
use crate::models::validation::{field_errors, rule, SchemaKind};
use crate::wizard::ListingStep;

pub const QUALITY_GRADES: &[&str] = &["premium", "grade_a", "grade_b", "standard"];
pub const UNITS: &[&str] = &["kg", "tonne", "bag", "crate", "bunch", "piece", "litre"];

pub const MAX_CERTIFICATIONS: usize = 10;
pub const MAX_LISTING_IMAGES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListingFields {
  pub title: Option<String>,
  pub crop_type: Option<String>,
  #[validate(length(max = 60, message = "must be at most 60 characters"))]
  pub variety: Option<String>,
  pub organic: Option<bool>,
  pub quality_grade: Option<String>,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub quantity_available: Option<f64>,
  pub unit: Option<String>,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub price_per_unit: Option<f64>,
  #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
  pub minimum_order_quantity: Option<f64>,
  pub harvest_date: Option<NaiveDate>,
  pub available_from: Option<NaiveDate>,
  pub available_until: Option<NaiveDate>,
  #[validate(length(max = 60, message = "must be at most 60 characters"))]
  pub storage_method: Option<String>,
  #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
  pub description: Option<String>,
  #[validate(length(max = 120, message = "must be at most 120 characters"))]
  pub location: Option<String>,
  #[validate(length(max = 10, message = "must list at most 10 certifications"))]
  pub certifications: Option<Vec<String>>,
  #[validate(length(max = 10, message = "must list at most 10 images"))]
  pub images: Option<Vec<String>>,
}

fn filled_text(value: &Option<String>) -> bool {
  value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn filled_list(value: &Option<Vec<String>>) -> bool {
  value.as_ref().is_some_and(|list| !list.is_empty())
}

impl ListingFields {
  /// Whether the field named by its JSON key carries a usable value.
  pub fn is_filled(&self, field: &str) -> bool {
    match field {
      "title" => filled_text(&self.title),
      "cropType" => filled_text(&self.crop_type),
      "variety" => filled_text(&self.variety),
      "organic" => self.organic.is_some(),
      "qualityGrade" => filled_text(&self.quality_grade),
      "quantityAvailable" => self.quantity_available.is_some(),
      "unit" => filled_text(&self.unit),
      "pricePerUnit" => self.price_per_unit.is_some(),
      "minimumOrderQuantity" => self.minimum_order_quantity.is_some(),
      "harvestDate" => self.harvest_date.is_some(),
      "availableFrom" => self.available_from.is_some(),
      "availableUntil" => self.available_until.is_some(),
      "storageMethod" => filled_text(&self.storage_method),
      "description" => filled_text(&self.description),
      "location" => filled_text(&self.location),
      "certifications" => filled_list(&self.certifications),
      "images" => filled_list(&self.images),
      _ => false,
    }
  }

  /// The subset of `fields` that is still empty, in the given order.
  pub fn missing(&self, fields: &[&'static str]) -> Vec<&'static str> {
    fields.iter().copied().filter(|f| !self.is_filled(f)).collect()
  }

  /// quantity × price, when both are known.
  pub fn total_value(&self) -> Option<f64> {
    match (self.quantity_available, self.price_per_unit) {
      (Some(q), Some(p)) => Some(crate::format::total_value(q, p)),
      _ => None,
    }
  }

  /// Runs the value rules, then the required set for `kind`. Collects every
  /// failure rather than stopping at the first.
  pub fn check(&self, kind: SchemaKind) -> std::result::Result<(), ValidationErrors> {
    let mut errors = self.rule_errors();
    for field in self.missing(kind.required_fields()) {
      errors.add(field, rule("required", "is required"));
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }

  /// JSON names of the fields whose present value breaks a rule. Empty fields
  /// are never reported here.
  pub fn invalid_fields(&self) -> Vec<String> {
    let mut fields: Vec<String> = field_errors(&self.rule_errors()).into_iter().map(|e| e.field).collect();
    fields.dedup();
    fields
  }

  /// Derived field rules plus trimmed lengths, enums and cross-field rules.
  fn rule_errors(&self) -> ValidationErrors {
    let mut errors = match self.validate() {
      Ok(()) => ValidationErrors::new(),
      Err(errors) => errors,
    };

    // Blank text is left to the required check.
    if trimmed_len(&self.title) > 120 {
      errors.add("title", rule("length", "must be between 1 and 120 characters"));
    }
    if trimmed_len(&self.crop_type) > 60 {
      errors.add("cropType", rule("length", "must be between 1 and 60 characters"));
    }
    if let Some(grade) = self.quality_grade.as_deref() {
      if !QUALITY_GRADES.contains(&grade) {
        errors.add("qualityGrade", rule("one_of", format!("must be one of: {}", QUALITY_GRADES.join(", "))));
      }
    }
    if let Some(unit) = self.unit.as_deref() {
      if !UNITS.contains(&unit) {
        errors.add("unit", rule("one_of", format!("must be one of: {}", UNITS.join(", "))));
      }
    }
    if let (Some(min_order), Some(quantity)) = (self.minimum_order_quantity, self.quantity_available) {
      if min_order > quantity {
        errors.add(
          "minimumOrderQuantity",
          rule("max_quantity", "must not exceed the quantity available"),
        );
      }
    }
    if let (Some(from), Some(until)) = (self.available_from, self.available_until) {
      if until < from {
        errors.add("availableUntil", rule("date_order", "must not be before availableFrom"));
      }
    }
    if let Some(certs) = &self.certifications {
      if certs.iter().any(|c| c.trim().is_empty() || c.chars().count() > 60) {
        errors.add(
          "certifications",
          rule("entry_length", "each certification must be between 1 and 60 characters"),
        );
      }
    }
    if let Some(images) = &self.images {
      if images.iter().any(|url| !is_http_url(url)) {
        errors.add("images", rule("url", "each image must be an http(s) URL"));
      }
    }
    errors
  }
}

fn trimmed_len(value: &Option<String>) -> usize {
  value.as_deref().map_or(0, |s| s.trim().chars().count())
}

fn is_http_url(candidate: &str) -> bool {
  let rest = candidate
    .strip_prefix("https://")
    .or_else(|| candidate.strip_prefix("http://"));
  matches!(rest, Some(host_and_path) if !host_and_path.is_empty() && !host_and_path.contains(char::is_whitespace))
}

/// Body of `POST /api/farmer/drafts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPayload {
  #[serde(flatten)]
  pub fields: ListingFields,
  #[serde(default)]
  pub current_step: Option<String>,
}

impl DraftPayload {
  pub fn validate_schema(&self) -> Result<()> {
    let mut errors = match self.fields.check(SchemaKind::Draft) {
      Ok(()) => ValidationErrors::new(),
      Err(errors) => errors,
    };
    if let Some(step) = self.current_step.as_deref() {
      if ListingStep::from_key(step).is_none() {
        errors.add("currentStep", rule("one_of", "must be a listing wizard step key"));
      }
    }
    if errors.is_empty() {
      Ok(())
    } else {
      Err(AppError::from(errors))
    }
  }
}

/// Body of `PUT /api/farmer/drafts`: the draft id travels in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftPayload {
  #[serde(default)]
  pub id: Option<Uuid>,
  #[serde(flatten)]
  pub draft: DraftPayload,
}

/// Body of `POST /api/farmer/products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
  #[serde(flatten)]
  pub fields: ListingFields,
  /// Draft promoted by this submission; deleted once the product exists.
  #[serde(default)]
  pub draft_id: Option<Uuid>,
}

impl CreateProductPayload {
  pub fn validate_schema(&self) -> Result<()> {
    self.fields.check(SchemaKind::Product).map_err(AppError::from)
  }
}
