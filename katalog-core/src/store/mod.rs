//! Key-value storage port and its adapters.

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Per-value size cap of the hosted key-value platform the catalog was
/// designed around (25 MB).
pub const DEFAULT_VALUE_CAP_BYTES: usize = 25_000_000;

/// String-keyed storage with size-capped values.
///
/// Implementations make no atomicity promises across keys; callers doing
/// read-modify-write accept last-write-wins semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short tag used in logs ("memory", "redis").
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Every key starting with `prefix`, in no guaranteed order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
