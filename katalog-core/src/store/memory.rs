use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::error::StoreError;

/// Process-local store used for development and tests.
///
/// With a value cap configured, oversized `put`s are rejected the same way a
/// hosted platform would reject them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    value_cap: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value_cap(cap: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            value_cap: Some(cap),
        }
    }

    pub fn value_cap(&self) -> Option<usize> {
        self.value_cap
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(cap) = self.value_cap
            && value.len() > cap
        {
            return Err(StoreError::ValueTooLarge {
                key: key.to_string(),
                size: value.len(),
                cap,
            });
        }
        debug!(key, bytes = value.len(), "memory store put");
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", "v".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = MemoryStore::new();
        for key in ["log:2", "log:1", "items", "logo"] {
            store.put(key, String::new()).await.unwrap();
        }

        let keys = store.list("log:").await.unwrap();
        assert_eq!(keys, vec!["log:1".to_string(), "log:2".to_string()]);
    }

    #[tokio::test]
    async fn cap_rejects_oversized_values() {
        let store = MemoryStore::with_value_cap(4);
        store.put("k", "1234".into()).await.unwrap();

        let err = store.put("k", "12345".into()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::ValueTooLarge { size: 5, cap: 4, .. }
        ));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("1234"));
    }
}
