use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use katalog_core::CatalogError;
use tracing::warn;

use crate::infra::{
    app_state::AppState,
    cache::{CachedResponse, image_key},
    errors::{AppError, AppResult},
};

/// Images are addressed by item id and items are immutable.
pub const BLOB_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Seconds clients should wait before retrying a failed image read.
const IMAGE_RETRY_AFTER_SECS: u32 = 2;

/// `GET /api/image/{id}`
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::bad_request("Missing ID"));
    }

    let key = image_key(id);
    if let Some(hit) = state.cache.get(&key) {
        return Ok(hit.into_response());
    }
    let generation = state.cache.generation();

    let resolved = tokio::time::timeout(state.config.timeouts.image(), state.images.resolve(id))
        .await
        .map_err(|_| {
            warn!(id, timeout_ms = state.config.timeouts.image_ms, "image lookup timed out");
            AppError::internal("Timed out loading image")
                .with_retry_after(IMAGE_RETRY_AFTER_SECS)
        })?;

    let image = match resolved {
        Ok(image) => image,
        Err(err @ CatalogError::Store(_)) => {
            return Err(state.app_error(err).with_retry_after(IMAGE_RETRY_AFTER_SECS));
        }
        Err(err) => return Err(state.app_error(err)),
    };

    let response = CachedResponse {
        content_type: HeaderValue::from_static(image.content_type),
        cache_control: HeaderValue::from_static(BLOB_CACHE_CONTROL),
        body: Bytes::from(image.bytes),
    };
    state
        .cache
        .insert(key, response.clone(), state.config.cache.image_ttl(), generation);

    Ok(response.into_response())
}
