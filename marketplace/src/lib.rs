// furrow_market/src/lib.rs

//! Produce marketplace backend: draft and product listing endpoints, image
//! upload to hosted object storage, a farmer dashboard, and the product
//! listing wizard that drives them.

pub mod config;
pub mod db;
pub mod errors;
pub mod flows;
pub mod format;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
pub mod wizard;

pub use errors::{AppError, Result};
pub use state::AppState;
