// furrow_market/src/wizard/steps.rs

use uuid::Uuid;

use crate::format::format_number;
use crate::models::{ListingFields, Product, ProductDraft};

/// The five listing steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStep {
  BasicInfo,
  QuantityPricing,
  ProductDetails,
  Images,
  Review,
}

impl ListingStep {
  pub const ALL: [ListingStep; 5] = [
    ListingStep::BasicInfo,
    ListingStep::QuantityPricing,
    ListingStep::ProductDetails,
    ListingStep::Images,
    ListingStep::Review,
  ];

  pub fn key(self) -> &'static str {
    match self {
      ListingStep::BasicInfo => "basic-info",
      ListingStep::QuantityPricing => "quantity-pricing",
      ListingStep::ProductDetails => "product-details",
      ListingStep::Images => "images",
      ListingStep::Review => "review",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      ListingStep::BasicInfo => "Basic information",
      ListingStep::QuantityPricing => "Quantity & pricing",
      ListingStep::ProductDetails => "Product details",
      ListingStep::Images => "Images",
      ListingStep::Review => "Review",
    }
  }

  pub fn from_key(key: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|step| step.key() == key)
  }

  /// Fields that must be filled before "next" is enabled on this step.
  pub fn required_fields(self) -> &'static [&'static str] {
    match self {
      ListingStep::BasicInfo => &["title", "cropType", "qualityGrade"],
      ListingStep::QuantityPricing => &["quantityAvailable", "unit", "pricePerUnit"],
      ListingStep::ProductDetails => &["harvestDate", "location"],
      ListingStep::Images => &["images"],
      ListingStep::Review => &[],
    }
  }

  /// Optional fields edited on this step. They never block while empty, but
  /// an invalid value does.
  pub fn optional_fields(self) -> &'static [&'static str] {
    match self {
      ListingStep::BasicInfo => &["variety", "organic"],
      ListingStep::QuantityPricing => &["minimumOrderQuantity"],
      ListingStep::ProductDetails => &[
        "availableFrom",
        "availableUntil",
        "storageMethod",
        "description",
        "certifications",
      ],
      ListingStep::Images | ListingStep::Review => &[],
    }
  }
}

/// Data accumulated by one listing wizard session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingForm {
  pub fields: ListingFields,
  /// Set after the first successful "save draft".
  pub draft_id: Option<Uuid>,
  /// Step key stored with the draft.
  pub current_step: Option<String>,
  /// Set once the listing was submitted.
  pub product: Option<Product>,
}

impl ListingForm {
  pub fn from_draft(draft: ProductDraft) -> Self {
    Self {
      fields: draft.fields,
      draft_id: Some(draft.id),
      current_step: draft.current_step,
      product: None,
    }
  }

  /// Fields keeping "next" disabled on `step`: required ones that are empty or
  /// invalid, then optional ones that are invalid.
  pub fn blocking_for(&self, step: ListingStep) -> Vec<&'static str> {
    let invalid = self.fields.invalid_fields();
    let is_invalid = |field: &str| invalid.iter().any(|f| f == field);
    let required = step
      .required_fields()
      .iter()
      .copied()
      .filter(|f| !self.fields.is_filled(f) || is_invalid(f));
    let optional = step.optional_fields().iter().copied().filter(|f| is_invalid(f));
    required.chain(optional).collect()
  }

  /// quantity × price for the review step, e.g. `"5,000,000"`.
  pub fn total_value_display(&self) -> Option<String> {
    self.fields.total_value().map(format_number)
  }
}
