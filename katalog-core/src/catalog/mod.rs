//! Partitioned item storage and the catalog operations built on it.

mod partition;
mod repository;
mod service;
pub mod validation;

pub use partition::{
    DEFAULT_THRESHOLD_RATIO, LayoutError, OVERFLOW_KEY, OVERFLOW_PARTITION,
    PRIMARY_KEY, PRIMARY_PARTITION, Partition, PartitionLayout,
    threshold_for_cap,
};
pub use repository::{ItemRepository, PartitionStats};
pub use service::{AddedItem, CatalogService, MonotonicClock};
pub use validation::{ValidItem, validate_new_item};
