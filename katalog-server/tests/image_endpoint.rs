use anyhow::Result;
use axum::http::StatusCode;
use katalog_core::{
    KeyValueStore, MemoryStore,
    api::routes::{api, image_path},
    model::Item,
};
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;
use support::{add_item, build_test_app, build_test_app_with, login, test_config};

async fn seed(store: &MemoryStore, items: &[Item]) -> Result<()> {
    store
        .put("items", serde_json::to_string(items)?)
        .await?;
    Ok(())
}

fn item(id: &str, base64: &str) -> Item {
    Item {
        id: id.into(),
        nama: "Contoh".into(),
        harga: 1000.0,
        satuan: "pcs".into(),
        base64: base64.into(),
        timestamp: 1,
    }
}

#[tokio::test]
async fn serves_decoded_bytes_with_immutable_caching() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;
    let cookie = login(server).await;
    let id = add_item(server, &cookie, "Sabun", 4500.0).await;

    let response = server.get(&image_path(&id)).await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(
        response.header("cache-control"),
        "public, max-age=31536000, immutable"
    );
    assert!(response.as_bytes().starts_with(b"\x89PNG\r\n\x1a\n"));
    Ok(())
}

#[tokio::test]
async fn raw_base64_without_data_uri_prefix_is_accepted() -> Result<()> {
    let store = MemoryStore::new();
    seed(&store, &[item("hello", "SGVsbG8=")]).await?;
    let app = build_test_app_with(test_config(), store).await?;

    let response = app.server.get(&image_path("hello")).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"Hello");
    // Neither declared nor recognizable, so the generic fallback applies.
    assert_eq!(response.header("content-type"), "image/jpeg");
    Ok(())
}

#[tokio::test]
async fn missing_items_and_empty_images_are_not_found() -> Result<()> {
    let store = MemoryStore::new();
    seed(&store, &[item("kosong", "")]).await?;
    let app = build_test_app_with(test_config(), store).await?;

    let absent = app.server.get(&image_path("tidak-ada")).await;
    absent.assert_status(StatusCode::NOT_FOUND);
    assert!(absent.json::<Value>()["error"].is_string());

    app.server
        .get(&image_path("kosong"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn undecodable_payload_is_a_bad_request() -> Result<()> {
    let store = MemoryStore::new();
    seed(&store, &[item("rusak", "data:image/png;base64,abc")]).await?;
    let app = build_test_app_with(test_config(), store).await?;

    let response = app.server.get(&image_path("rusak")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid image data");
    Ok(())
}

#[tokio::test]
async fn deleting_an_item_evicts_its_cached_image() -> Result<()> {
    let mut config = test_config();
    config.cache.enabled = true;
    let app = build_test_app_with(config, MemoryStore::new()).await?;
    let server = &app.server;
    let cookie = login(server).await;
    let id = add_item(server, &cookie, "Sikat", 7000.0).await;

    server.get(&image_path(&id)).await.assert_status_ok();
    assert!(!app.state.cache.is_empty());

    server
        .post(api::items::DELETE)
        .add_header("cookie", cookie)
        .json(&serde_json::json!({ "id": id }))
        .await
        .assert_status_ok();

    server
        .get(&image_path(&id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}
