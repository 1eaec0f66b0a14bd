pub mod response_cache;

pub use response_cache::{
    CachedResponse, DEFAULT_MAX_ENTRIES, ResponseCache, image_key, list_key,
};
