use axum::{Json, extract::State};
use katalog_core::{api::LogsClearResponse, audit::MAX_RECENT};
use katalog_model::{AuditEntry, AuditLevel};
use tracing::info;

use crate::infra::{app_state::AppState, errors::AppResult};

/// `GET /api/logs` (admin): newest first, at most [`MAX_RECENT`].
pub async fn list_logs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let entries = state
        .audit
        .recent(MAX_RECENT)
        .await
        .map_err(|err| state.app_error(err))?;
    Ok(Json(entries))
}

/// `POST /api/logs-clear` (admin)
pub async fn clear_logs(
    State(state): State<AppState>,
) -> AppResult<Json<LogsClearResponse>> {
    let deleted = state
        .audit
        .clear()
        .await
        .map_err(|err| state.app_error(err))?;
    info!(deleted, "audit log cleared");

    // Recorded after the wipe so the clear itself stays visible.
    state
        .audit
        .record(AuditLevel::Warn, "Admin menghapus semua log")
        .await;

    Ok(Json(LogsClearResponse {
        success: true,
        deleted,
    }))
}
