//! Core library for the Katalog service.
//!
//! Items live as JSON arrays inside a small, ordered set of key-value
//! partitions so that no single stored value outgrows the backend's size
//! cap. On top of the [`catalog::ItemRepository`] sit the validating
//! [`catalog::CatalogService`], the single-admin [`auth::AuthGate`], the
//! data-URI [`image::ImageResolver`] and the best-effort [`audit::AuditLog`].

pub mod api;
pub mod audit;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod image;
pub mod store;

pub use audit::AuditLog;
pub use auth::{AdminCredentials, AuthGate};
pub use catalog::{
    AddedItem, CatalogService, ItemRepository, LayoutError, Partition,
    PartitionLayout, PartitionStats,
};
pub use error::{CatalogError, FieldViolation, Result, StoreError, ValidationErrors};
pub use image::{ImageResolver, ResolvedImage};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(feature = "redis")]
pub use store::RedisStore;

pub use katalog_model as model;
