use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::Utc;
use katalog_model::{Item, Page, PageRequest};
use tracing::info;
use uuid::Uuid;

use super::repository::ItemRepository;
use super::validation::validate_new_item;
use crate::api::NewItemRequest;
use crate::error::Result;

/// Outcome of a successful [`CatalogService::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    pub id: String,
    /// Partition that absorbed the write.
    pub partition: String,
}

/// Millisecond clock that never runs backwards within one process.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicI64,
}

impl MonotonicClock {
    pub fn now_millis(&self) -> i64 {
        self.observe(Utc::now().timestamp_millis())
    }

    fn observe(&self, wall: i64) -> i64 {
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}

/// Validated, sorted and paginated access to the [`ItemRepository`].
#[derive(Debug, Clone)]
pub struct CatalogService {
    repository: ItemRepository,
    clock: Arc<MonotonicClock>,
}

impl CatalogService {
    pub fn new(repository: ItemRepository) -> Self {
        Self {
            repository,
            clock: Arc::new(MonotonicClock::default()),
        }
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    pub async fn add(&self, input: &NewItemRequest) -> Result<AddedItem> {
        let valid = validate_new_item(input)?;
        let item = Item {
            id: Uuid::new_v4().to_string(),
            nama: valid.nama,
            harga: valid.harga,
            satuan: valid.satuan,
            base64: valid.base64,
            timestamp: self.clock.now_millis(),
        };

        let partition = self.repository.add(&item).await?;
        info!(id = %item.id, nama = %item.nama, %partition, "Catalog item added");
        Ok(AddedItem {
            id: item.id,
            partition,
        })
    }

    /// Items ordered by creation time, oldest first. Items sharing a
    /// timestamp keep the order the repository returned them in.
    pub async fn list(&self, request: PageRequest) -> Page<Item> {
        let mut items = self.repository.list_all().await;
        items.sort_by_key(|item| item.timestamp);
        Page::slice(items, request)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.repository.delete_by_id(id).await?)
    }

    pub async fn find(&self, id: &str) -> Option<Item> {
        self.repository.find(id).await
    }
}
