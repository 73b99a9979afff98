// furrow_market/src/web/handlers/mod.rs

pub mod dashboard_handlers;
pub mod draft_handlers;
pub mod health_handlers;
pub mod image_handlers;
pub mod product_handlers;
