//! HTTP handlers, one module per resource.

pub mod auth;
pub mod catalog;
pub mod images;
pub mod logs;

use axum::extract::FromRequest;

use crate::infra::errors::AppError;

/// JSON body extractor whose rejections render as [`AppError`] (400 with
/// an `error` message) instead of axum's plain-text default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
