// furrow_market/src/wizard/mod.rs

//! The product listing wizard: basic-info, quantity-pricing, product-details,
//! images, review. "Save draft" goes through the draft endpoints and "submit"
//! through the product endpoint, via a [`ListingBackend`].

pub mod client;
pub mod listing_wizard;
pub mod steps;

pub use client::MarketplaceClient;
pub use listing_wizard::{ListingBackend, ListingWizard};
pub use steps::{ListingForm, ListingStep};
