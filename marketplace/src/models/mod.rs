// furrow_market/src/models/mod.rs

pub mod draft;
pub mod image;
pub mod listing;
pub mod product;
pub mod validation;

pub use draft::ProductDraft;
pub use image::{PendingImage, UploadedImage};
pub use listing::{CreateProductPayload, DraftPayload, ListingFields, UpdateDraftPayload};
pub use product::{NewProduct, Product, ProductStatus};
pub use validation::SchemaKind;
