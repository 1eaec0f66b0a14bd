//! Core data model definitions shared across Katalog crates.
#![allow(missing_docs)]

pub mod audit;
pub mod item;
pub mod page;

pub use audit::{AuditEntry, AuditLevel};
pub use item::Item;
pub use page::{DEFAULT_LIMIT, MAX_LIMIT, Page, PageRequest};
