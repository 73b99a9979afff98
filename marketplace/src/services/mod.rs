// furrow_market/src/services/mod.rs

pub mod auth_service;
pub mod image_service;
pub mod storage_service;

pub use auth_service::{HostedAuthClient, SessionResolver};
pub use storage_service::{HostedStorageClient, ObjectStorage};
