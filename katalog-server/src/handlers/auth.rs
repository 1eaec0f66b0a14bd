use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use katalog_core::{
    CatalogError,
    api::{AdminStatus, LoginRequest, SuccessResponse},
};
use katalog_model::AuditLevel;
use tracing::info;

use super::ApiJson;
use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    middleware::{clear_session_cookie, is_admin, session_cookie},
};

/// `POST /api/login`
///
/// A successful login replaces any previous session token, so at most one
/// admin session is live at a time.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Response> {
    match state.auth.login(&body.username, &body.password).await {
        Ok(token) => {
            info!("admin logged in");
            state
                .audit
                .record(AuditLevel::Info, "Admin login")
                .await;
            let cookie = session_cookie(&token, state.config.auth.cookie_secure);
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(SuccessResponse::OK),
            )
                .into_response())
        }
        Err(CatalogError::Unauthorized) => {
            state
                .audit
                .record(AuditLevel::Warn, "Login gagal: kredensial salah")
                .await;
            Ok((StatusCode::UNAUTHORIZED, Json(SuccessResponse::FAILED))
                .into_response())
        }
        Err(err) => Err(state.app_error(err)),
    }
}

/// `GET|POST /api/logout`
///
/// Only clears the client cookie; the stored token stays valid until the
/// next login replaces it.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_session_cookie(state.config.auth.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Json(SuccessResponse::OK)).into_response()
}

/// `GET /api/check-admin`
pub async fn check_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<AdminStatus> {
    Json(AdminStatus {
        is_admin: is_admin(&state, &headers).await,
    })
}
