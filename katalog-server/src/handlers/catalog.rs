use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use katalog_core::{
    CatalogError,
    api::{
        AddItemResponse, DeleteItemRequest, ListQuery, NewItemRequest,
        SuccessResponse,
    },
};
use katalog_model::{AuditLevel, PageRequest};
use tracing::{error, info, warn};

use super::ApiJson;
use crate::infra::{
    app_state::AppState,
    cache::{CachedResponse, list_key},
    errors::{AppError, AppResult},
};

/// `GET /api/list?page=&limit=`
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let request = PageRequest::new(query.page(), query.limit());
    let key = list_key(&request);
    if let Some(hit) = state.cache.get(&key) {
        return Ok(hit.into_response());
    }
    let generation = state.cache.generation();

    let page = tokio::time::timeout(
        state.config.timeouts.list(),
        state.catalog.list(request),
    )
    .await
    .map_err(|_| {
        warn!(timeout_ms = state.config.timeouts.list_ms, "catalog list timed out");
        AppError::internal("Timed out reading catalog")
    })?;

    let body = serde_json::to_vec(&page).map_err(|err| {
        error!(error = %err, "failed to encode catalog page");
        AppError::internal("Failed to encode catalog page")
    })?;

    let ttl = state.config.cache.list_ttl();
    let cache_control =
        HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs()))
            .unwrap_or(HeaderValue::from_static("no-cache"));
    let response = CachedResponse {
        content_type: HeaderValue::from_static("application/json"),
        cache_control,
        body: Bytes::from(body),
    };
    state.cache.insert(key, response.clone(), ttl, generation);

    Ok(response.into_response())
}

/// `POST /api/tambah` (admin)
pub async fn add_item(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewItemRequest>,
) -> AppResult<Json<AddItemResponse>> {
    match state.catalog.add(&body).await {
        Ok(added) => {
            state.cache.invalidate_list();
            let nama = body.nama.as_deref().unwrap_or_default().trim();
            state
                .audit
                .record(
                    AuditLevel::Info,
                    format!("Barang ditambah: {nama} ({}) ke {}", added.id, added.partition),
                )
                .await;
            Ok(Json(AddItemResponse {
                success: true,
                id: added.id,
                stored_in: added.partition,
            }))
        }
        Err(err @ CatalogError::Validation(_)) => {
            info!(error = %err, "add rejected by validation");
            Err(state.app_error(err))
        }
        Err(err) => {
            state
                .audit
                .record(AuditLevel::Error, format!("Gagal menambah barang: {err}"))
                .await;
            Err(state.app_error(err))
        }
    }
}

/// `POST /api/hapus` (admin)
pub async fn delete_item(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DeleteItemRequest>,
) -> AppResult<Json<SuccessResponse>> {
    let id = body
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing ID"))?;

    match state.catalog.delete(id).await {
        Ok(true) => {
            state.cache.invalidate_list();
            state.cache.invalidate_image(id);
            state
                .audit
                .record(AuditLevel::Info, format!("Barang dihapus: {id}"))
                .await;
            Ok(Json(SuccessResponse::OK))
        }
        Ok(false) => {
            state
                .audit
                .record(
                    AuditLevel::Warn,
                    format!("Gagal hapus: ID {id} tidak ditemukan"),
                )
                .await;
            Err(AppError::not_found("ID not found"))
        }
        Err(err) => {
            state
                .audit
                .record(AuditLevel::Error, format!("Gagal menghapus barang: {err}"))
                .await;
            Err(state.app_error(err))
        }
    }
}
