use std::sync::Arc;

use anyhow::Context;
use katalog_core::{KeyValueStore, MemoryStore, RedisStore};
use tracing::info;

use crate::infra::config::{StoreBackend, StoreConfig};

/// Open the configured store backend.
pub async fn connect_store(
    config: &StoreConfig,
) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!(
                value_cap_bytes = config.value_cap_bytes,
                "using in-memory store; data is lost on restart"
            );
            Ok(Arc::new(MemoryStore::with_value_cap(config.value_cap_bytes)))
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis backend selected without a redis_url")?;
            let mut store = RedisStore::connect(url)
                .await
                .context("failed to connect to Redis")?
                .with_value_cap(config.value_cap_bytes);
            if let Some(namespace) = &config.redis_namespace {
                store = store.with_namespace(namespace.clone());
            }
            Ok(Arc::new(store))
        }
    }
}
