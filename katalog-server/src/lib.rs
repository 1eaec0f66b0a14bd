//! # Katalog Server
//!
//! HTTP surface for the Katalog item catalog: paginated listing, admin-gated
//! add/delete, image serving from stored base64 payloads, a single-session
//! admin login and an audit log. Storage goes through
//! [`katalog_core::KeyValueStore`], so the same server runs against Redis or
//! an in-process map.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::{create_api_router, create_app};
