use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use katalog_core::{CatalogError, FieldViolation, StoreError};
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

/// Handler error rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field violations, present only for validation failures.
    pub fields: Vec<FieldViolation>,
    /// Seconds for a `Retry-After` header.
    pub retry_after: Option<u32>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: Vec::new(),
            retry_after: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn with_retry_after(mut self, seconds: u32) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Store failure; the underlying detail only reaches the client in dev
    /// mode.
    pub fn store(err: &StoreError, dev_mode: bool) -> Self {
        tracing::error!(error = %err, "store operation failed");
        if dev_mode {
            Self::internal(err.to_string())
        } else {
            Self::internal("Storage unavailable")
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.fields.is_empty() {
            json!({ "error": self.message })
        } else {
            json!({ "error": self.message, "fields": self.fields })
        };

        let mut response = (self.status, Json(body)).into_response();
        if let Some(seconds) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => {
                let mut app = Self::bad_request(errors.to_string());
                app.fields = errors.violations().to_vec();
                app
            }
            CatalogError::Unauthorized => Self::unauthorized("Unauthorized"),
            CatalogError::NotFound(_) => Self::not_found("Not found"),
            CatalogError::InvalidImageData(_) => {
                Self::bad_request("Invalid image data")
            }
            CatalogError::TokenGeneration => {
                tracing::error!("session token generation failed");
                Self::internal("Login failed")
            }
            CatalogError::Store(err) => Self::store(&err, false),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use katalog_core::ValidationErrors;

    #[test]
    fn validation_maps_to_bad_request_with_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("harga", "Harga harus angka positif");
        let app = AppError::from(CatalogError::Validation(errors));

        assert_eq!(app.status, StatusCode::BAD_REQUEST);
        assert_eq!(app.message, "Harga harus angka positif");
        assert_eq!(app.fields.len(), 1);
    }

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(CatalogError::Unauthorized).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(CatalogError::NotFound("x".into())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CatalogError::InvalidImageData("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        let store = AppError::from(CatalogError::Store(StoreError::Backend(
            "down".into(),
        )));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!store.message.contains("down"));
    }

    #[test]
    fn retry_after_header_is_set() {
        let response = AppError::internal("busy").with_retry_after(2).into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "2"
        );
    }
}
