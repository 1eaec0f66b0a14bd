//! Decoding of the data URIs stored on items.

mod magic;

pub use magic::{SniffFailure, normalize_declared, sniff_content_type};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use katalog_model::Item;
use tracing::{debug, warn};

use crate::catalog::ItemRepository;
use crate::error::{CatalogError, Result};

const BASE64_MARKER: &str = ";base64,";

/// Served when neither the declared mime nor the bytes name a format.
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Decoded image ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Looks up an item and decodes its embedded image.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    repository: ItemRepository,
}

impl ImageResolver {
    pub fn new(repository: ItemRepository) -> Self {
        Self { repository }
    }

    pub async fn resolve(&self, id: &str) -> Result<ResolvedImage> {
        let item = self
            .repository
            .find(id)
            .await
            .filter(|item| !item.base64.is_empty())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        decode_item_image(&item).inspect_err(|err| {
            warn!(id, error = %err, "Stored image could not be decoded");
        })
    }
}

/// Decode the data URI on `item`.
///
/// Without a `;base64,` marker the whole field is taken as the payload.
pub fn decode_item_image(item: &Item) -> Result<ResolvedImage> {
    let payload = match item.base64.find(BASE64_MARKER) {
        Some(at) => &item.base64[at + BASE64_MARKER.len()..],
        None => item.base64.as_str(),
    };
    let payload = payload.trim();

    if payload.is_empty() {
        return Err(CatalogError::InvalidImageData("empty payload".into()));
    }
    if payload.len() % 4 != 0 {
        return Err(CatalogError::InvalidImageData(format!(
            "payload length {} is not a multiple of 4",
            payload.len()
        )));
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| CatalogError::InvalidImageData(err.to_string()))?;

    let content_type = item
        .declared_mime()
        .and_then(normalize_declared)
        .or_else(|| sniff_content_type(&bytes).ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE);
    debug!(id = %item.id, content_type, bytes = bytes.len(), "Image decoded");

    Ok(ResolvedImage {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::PartitionLayout;
    use crate::store::{KeyValueStore, MemoryStore};

    fn item(uri: &str) -> Item {
        Item {
            id: "img".into(),
            nama: "Teh".into(),
            harga: 3_000.0,
            satuan: "box".into(),
            base64: uri.into(),
            timestamp: 1,
        }
    }

    async fn resolver_with(items: Vec<Item>) -> ImageResolver {
        let store = Arc::new(MemoryStore::new());
        store
            .put("items", serde_json::to_string(&items).unwrap())
            .await
            .unwrap();
        ImageResolver::new(ItemRepository::new(store, PartitionLayout::default()))
    }

    #[tokio::test]
    async fn resolves_declared_png() {
        let resolver =
            resolver_with(vec![item("data:image/png;base64,SGVsbG8=")]).await;
        let image = resolver.resolve("img").await.unwrap();
        assert_eq!(image.bytes, b"Hello");
        assert_eq!(image.content_type, "image/png");
    }

    #[tokio::test]
    async fn missing_or_empty_items_are_not_found() {
        let resolver = resolver_with(vec![item("")]).await;
        assert!(matches!(
            resolver.resolve("img").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            resolver.resolve("nope").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_payloads_are_invalid() {
        for uri in [
            "data:image/png;base64,",
            "data:image/png;base64,SGVsbG8",
            "data:image/png;base64,SGV$bG8=",
        ] {
            assert!(matches!(
                decode_item_image(&item(uri)),
                Err(CatalogError::InvalidImageData(_))
            ));
        }
    }

    #[test]
    fn unknown_mime_falls_back_to_sniffing_then_jpeg() {
        // "R0lGODlh" decodes to "GIF89a".
        let gif = decode_item_image(&item("data:image/x-foo;base64,R0lGODlh")).unwrap();
        assert_eq!(gif.content_type, "image/gif");

        let raw = decode_item_image(&item("SGVsbG8=")).unwrap();
        assert_eq!(raw.bytes, b"Hello");
        assert_eq!(raw.content_type, FALLBACK_CONTENT_TYPE);
    }
}
