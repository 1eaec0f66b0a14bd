#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result, anyhow};
use axum_test::{TestResponse, TestServer};
use katalog_core::{KeyValueStore, MemoryStore, api::routes::api};
use katalog_server::{
    AppState, create_app,
    infra::config::Config,
};
use serde_json::json;

pub const ADMIN_USERNAME: &str = "penjaga";
pub const ADMIN_PASSWORD: &str = "rahasia-uji";

/// 1x1 transparent PNG.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

/// Config with known credentials and every cache disabled, so each request
/// hits the store.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.admin_username = ADMIN_USERNAME.into();
    config.auth.admin_password = ADMIN_PASSWORD.into();
    config.cache.enabled = false;
    config
}

pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with(test_config(), MemoryStore::new()).await
}

pub async fn build_test_app_with(config: Config, store: MemoryStore) -> Result<TestApp> {
    let store = Arc::new(store);
    let (server, state) = build_server(config, store.clone()).await?;

    Ok(TestApp {
        server,
        state,
        store,
    })
}

/// Server over an arbitrary store, for tests that wrap the memory store.
pub async fn build_server(
    config: Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<(TestServer, AppState)> {
    let state = AppState::new(config, store).context("failed to build app state")?;

    let router = create_app(state.clone());
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();
    let server = TestServer::builder()
        .http_transport()
        .build(make_service)
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok((server, state))
}

/// `name=value` pair from a `Set-Cookie` response header.
pub fn cookie_pair(response: &TestResponse) -> String {
    let header = response.header("set-cookie");
    let raw = header.to_str().expect("set-cookie is ascii");
    raw.split(';').next().unwrap_or_default().trim().to_string()
}

/// Logs in with the test credentials and returns the `Cookie` header value.
pub async fn login(server: &TestServer) -> String {
    let response = server
        .post(api::auth::LOGIN)
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();
    cookie_pair(&response)
}

pub fn item_body(nama: &str, harga: f64) -> serde_json::Value {
    json!({
        "nama": nama,
        "harga": harga,
        "satuan": "pcs",
        "base64": PNG_DATA_URI,
    })
}

/// Adds an item as admin and returns its id.
pub async fn add_item(server: &TestServer, cookie: &str, nama: &str, harga: f64) -> String {
    let response = server
        .post(api::items::ADD)
        .add_header("cookie", cookie.to_string())
        .json(&item_body(nama, harga))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["id"].as_str().expect("id present").to_string()
}
