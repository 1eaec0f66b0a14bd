use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use katalog_model::AuditLevel;
use tracing::{error, warn};

use crate::infra::{app_state::AppState, errors::AppError};

/// Cookie carrying the admin session token.
pub const ADMIN_COOKIE: &str = "admin";

pub fn session_cookie(token: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{ADMIN_COOKIE}={token}; HttpOnly{secure}; SameSite=Strict; Path=/")
}

pub fn clear_session_cookie(secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{ADMIN_COOKIE}=; HttpOnly{secure}; SameSite=Strict; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    )
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == ADMIN_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

/// Whether the request carries the current session token. Store failures
/// count as "not an admin".
pub async fn is_admin(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(token) = extract_session_token(headers) else {
        return false;
    };
    match state.auth.verify(&token).await {
        Ok(valid) => valid,
        Err(err) => {
            error!(error = %err, "session verification failed");
            false
        }
    }
}

/// Rejects the request with 401 unless it carries a valid admin session.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_admin(&state, request.headers()).await {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    warn!(path = %path, "unauthorized admin request");
    state
        .audit
        .record(AuditLevel::Warn, format!("Ditolak (unauthorized): {path}"))
        .await;
    AppError::unauthorized("Unauthorized").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_admin_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; admin=tok-123; lang=id"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok-123"));
    }

    #[test]
    fn ignores_empty_and_lookalike_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("administrator=x; admin="));
        assert_eq!(extract_session_token(&headers), None);
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            session_cookie("abc", true),
            "admin=abc; HttpOnly; Secure; SameSite=Strict; Path=/"
        );
        assert!(!session_cookie("abc", false).contains("Secure"));
        assert!(clear_session_cookie(true).contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }
}
