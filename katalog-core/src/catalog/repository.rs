use std::{any::type_name_of_val, fmt, sync::Arc};

use katalog_model::Item;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::partition::{Partition, PartitionLayout};
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Snapshot of one partition, as reported by [`ItemRepository::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub name: String,
    pub key: String,
    pub items: usize,
    pub bytes: usize,
    /// `false` when the stored value exists but is not a JSON item array.
    pub parsed: bool,
}

/// Append-only item storage spread over the partitions of a
/// [`PartitionLayout`].
///
/// Every operation is an unlocked read-modify-write against the store.
/// Two concurrent writers touching the same partition can lose one of the
/// writes; the last `put` wins.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn KeyValueStore>,
    layout: Arc<PartitionLayout>,
}

impl fmt::Debug for ItemRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRepository")
            .field("store", &type_name_of_val(self.store.as_ref()))
            .field("layout", &self.layout)
            .finish()
    }
}

impl ItemRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, layout: PartitionLayout) -> Self {
        Self {
            store,
            layout: Arc::new(layout),
        }
    }

    pub fn layout(&self) -> &PartitionLayout {
        &self.layout
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn read_partition(
        &self,
        partition: &Partition,
    ) -> Result<Vec<Item>, StoreError> {
        let Some(raw) = self.store.get(partition.key()).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: partition.key().to_string(),
            source,
        })
    }

    async fn write_partition(
        &self,
        partition: &Partition,
        items: &[Item],
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(items)?;
        self.store.put(partition.key(), encoded).await
    }

    /// Every item of every partition, in layout order.
    ///
    /// Partitions that are missing, unreadable or corrupt contribute
    /// nothing; this never fails.
    pub async fn list_all(&self) -> Vec<Item> {
        let mut all = Vec::new();
        for partition in self.layout.partitions() {
            match self.read_partition(partition).await {
                Ok(items) => all.extend(items),
                Err(err) => warn!(
                    partition = partition.name(),
                    error = %err,
                    "Treating unreadable partition as empty"
                ),
            }
        }
        all
    }

    pub async fn find(&self, id: &str) -> Option<Item> {
        self.list_all().await.into_iter().find(|item| item.has_id(id))
    }

    /// Appends `item` to the first probed partition that stays under the
    /// threshold after the append, else to the fallback partition.
    ///
    /// Any failure while probing sends the write straight to the fallback.
    /// Only a failure on the fallback itself is returned.
    pub async fn add(&self, item: &Item) -> Result<String, StoreError> {
        for partition in self.layout.probed() {
            match self.try_append(partition, item).await {
                Ok(true) => {
                    info!(
                        id = %item.id,
                        partition = partition.name(),
                        "Item stored"
                    );
                    return Ok(partition.name().to_string());
                }
                Ok(false) => debug!(
                    partition = partition.name(),
                    threshold = self.layout.threshold_bytes(),
                    "Partition full, probing next"
                ),
                Err(err) => {
                    warn!(
                        partition = partition.name(),
                        error = %err,
                        "Probe failed, falling back"
                    );
                    break;
                }
            }
        }

        let fallback = self.layout.fallback();
        let mut items = self.read_partition(fallback).await?;
        items.push(item.clone());
        self.write_partition(fallback, &items).await?;
        info!(
            id = %item.id,
            partition = fallback.name(),
            "Item stored in fallback partition"
        );
        Ok(fallback.name().to_string())
    }

    /// `Ok(false)` when the partition would reach the threshold.
    async fn try_append(
        &self,
        partition: &Partition,
        item: &Item,
    ) -> Result<bool, StoreError> {
        let mut items = self.read_partition(partition).await?;
        items.push(item.clone());
        let encoded = serde_json::to_string(&items)?;
        if encoded.len() >= self.layout.threshold_bytes() {
            return Ok(false);
        }
        self.store.put(partition.key(), encoded).await?;
        Ok(true)
    }

    /// Removes every item with `id` from every partition. Partitions are
    /// only rewritten when something was removed.
    ///
    /// Corrupt partitions are skipped; read and write failures surface.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut found = false;
        for partition in self.layout.partitions() {
            let mut items = match self.read_partition(partition).await {
                Ok(items) => items,
                Err(err @ StoreError::Corrupt { .. }) => {
                    warn!(
                        partition = partition.name(),
                        error = %err,
                        "Skipping corrupt partition during delete"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };

            let before = items.len();
            items.retain(|item| !item.has_id(id));
            if items.len() != before {
                self.write_partition(partition, &items).await?;
                found = true;
                info!(id, partition = partition.name(), "Item deleted");
            }
        }
        Ok(found)
    }

    pub async fn stats(&self) -> Result<Vec<PartitionStats>, StoreError> {
        let mut stats = Vec::with_capacity(self.layout.partitions().len());
        for partition in self.layout.partitions() {
            let raw = self.store.get(partition.key()).await?;
            let (items, parsed) = match raw.as_deref() {
                None => (0, true),
                Some(raw) => match serde_json::from_str::<Vec<Item>>(raw) {
                    Ok(items) => (items.len(), true),
                    Err(_) => (0, false),
                },
            };
            stats.push(PartitionStats {
                name: partition.name().to_string(),
                key: partition.key().to_string(),
                items,
                bytes: raw.map(|raw| raw.len()).unwrap_or(0),
                parsed,
            });
        }
        Ok(stats)
    }
}
