use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use katalog_core::api::routes::{api, image_path};
use katalog_model::PageRequest;
use tracing::debug;

/// Default bound on cached responses.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// A fully rendered response body plus the headers needed to replay it.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub content_type: HeaderValue,
    pub cache_control: HeaderValue,
    pub body: Bytes,
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::OK;
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, self.content_type);
        headers.insert(header::CACHE_CONTROL, self.cache_control);
        response
    }
}

/// Cache key for a list page. Only the normalized page and limit matter, so
/// arbitrary query strings collapse onto the same few keys.
pub fn list_key(request: &PageRequest) -> String {
    format!(
        "{}?page={}&limit={}",
        api::items::LIST,
        request.page(),
        request.limit()
    )
}

/// Cache key for an item's image. Query strings (cache busters) are ignored.
pub fn image_key(id: &str) -> String {
    image_path(id)
}

#[derive(Debug)]
struct Entry {
    response: CachedResponse,
    inserted_at: Instant,
    expires_at: Instant,
}

/// In-process cache of list and image responses.
///
/// Population never fails a request. Adds drop every list entry; deletes
/// drop list entries and the deleted item's image. At most `max_entries`
/// responses are held: expired entries go first, then the oldest.
///
/// Every invalidation bumps a generation counter. Handlers read it with
/// [`ResponseCache::generation`] before touching the store and pass it to
/// [`ResponseCache::insert`], which refuses responses read before an
/// invalidation.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, Entry>,
    enabled: bool,
    max_entries: usize,
    generation: AtomicU64,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResponseCache {
    pub fn new(enabled: bool) -> Self {
        Self::with_capacity(enabled, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(enabled: bool, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            enabled,
            max_entries: max_entries.max(1),
            generation: AtomicU64::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        if !self.enabled {
            return None;
        }
        let hit = self.entries.get(key).and_then(|entry| {
            (entry.expires_at > Instant::now()).then(|| entry.response.clone())
        });
        if hit.is_none() {
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        } else {
            debug!(key, "response cache hit");
        }
        hit
    }

    /// Store `response` unless an invalidation happened since `generation`
    /// was read.
    pub fn insert(
        &self,
        key: impl Into<String>,
        response: CachedResponse,
        ttl: Duration,
        generation: u64,
    ) {
        if !self.enabled || ttl.is_zero() || self.generation() != generation {
            return;
        }
        let key = key.into();
        self.make_room(&key);

        let now = Instant::now();
        self.entries.insert(
            key.clone(),
            Entry {
                response,
                inserted_at: now,
                expires_at: now + ttl,
            },
        );

        // An invalidation that raced the insert above may already have swept
        // the map; drop the entry ourselves in that case.
        if self.generation() != generation {
            debug!(key = %key, "dropping response read before invalidation");
            self.entries.remove(&key);
        }
    }

    pub fn invalidate_list(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let prefix = api::items::LIST;
        self.entries.retain(|key, _| !is_under(key, prefix));
    }

    /// Drop every cached variant of `id`'s image.
    pub fn invalidate_image(&self, id: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let path = image_path(id);
        self.entries.retain(|key, _| !is_under(key, &path));
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
    }

    fn make_room(&self, incoming: &str) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(incoming) {
            return;
        }

        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);

        while self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.inserted_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    debug!(key = %key, "evicting oldest cached response");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// `key` is exactly `path` or `path` followed by a query string.
fn is_under(key: &str, path: &str) -> bool {
    key.strip_prefix(path)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('?'))
}
