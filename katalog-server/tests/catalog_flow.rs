use anyhow::Result;
use axum::http::StatusCode;
use katalog_core::{MemoryStore, api::routes::api};
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;
use support::{add_item, build_test_app, build_test_app_with, item_body, login, test_config};

#[tokio::test]
async fn add_list_and_delete_round_trip() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;
    let cookie = login(server).await;

    let response = server
        .post(api::items::ADD)
        .add_header("cookie", cookie.clone())
        .json(&json!({
            "nama": "  Beras Pandan  ",
            "harga": "12500",
            "satuan": "kg",
            "base64": support::PNG_DATA_URI,
        }))
        .await;
    response.assert_status_ok();
    let added: Value = response.json();
    assert_eq!(added["success"], true);
    assert_eq!(added["storedIn"], "primary");
    let id = added["id"].as_str().expect("id present").to_string();

    let list: Value = server.get(api::items::LIST).await.json();
    assert_eq!(list["total"], 1);
    assert_eq!(list["page"], 1);
    assert_eq!(list["limit"], 10);
    assert_eq!(list["hasMore"], false);
    assert_eq!(list["items"][0]["id"], id.as_str());
    assert_eq!(list["items"][0]["nama"], "Beras Pandan");
    assert_eq!(list["items"][0]["harga"], 12500.0);

    let deleted = server
        .post(api::items::DELETE)
        .add_header("cookie", cookie.clone())
        .json(&json!({ "id": id }))
        .await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>(), json!({ "success": true }));

    let list: Value = server.get(api::items::LIST).await.json();
    assert_eq!(list["total"], 0);

    let again = server
        .post(api::items::DELETE)
        .add_header("cookie", cookie)
        .json(&json!({ "id": id }))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(again.json::<Value>()["error"], "ID not found");
    Ok(())
}

#[tokio::test]
async fn writes_require_admin_session() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;

    let add = server
        .post(api::items::ADD)
        .json(&item_body("Gula", 15000.0))
        .await;
    add.assert_status(StatusCode::UNAUTHORIZED);

    let delete = server
        .post(api::items::DELETE)
        .add_header("cookie", "admin=forged-token")
        .json(&json!({ "id": "whatever" }))
        .await;
    delete.assert_status(StatusCode::UNAUTHORIZED);

    let list: Value = server.get(api::items::LIST).await.json();
    assert_eq!(list["total"], 0);
    Ok(())
}

#[tokio::test]
async fn validation_reports_every_field() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;
    let cookie = login(server).await;

    let response = server
        .post(api::items::ADD)
        .add_header("cookie", cookie)
        .json(&json!({
            "nama": "   ",
            "harga": -3,
            "satuan": "",
            "base64": "not-a-data-uri",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields present")
        .iter()
        .filter_map(|field| field["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["nama", "harga", "satuan", "base64"]);
    assert!(body["error"].as_str().unwrap().contains("Nama barang harus diisi"));
    Ok(())
}

#[tokio::test]
async fn unknown_fields_and_bad_json_are_rejected() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;
    let cookie = login(server).await;

    let mut body = item_body("Kopi", 20000.0);
    body["diskon"] = json!(10);
    let response = server
        .post(api::items::ADD)
        .add_header("cookie", cookie.clone())
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let missing = server
        .post(api::items::DELETE)
        .add_header("cookie", cookie)
        .json(&json!({ "id": "  " }))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["error"], "Missing ID");
    Ok(())
}

#[tokio::test]
async fn pagination_walks_items_in_creation_order() -> Result<()> {
    let app = build_test_app().await?;
    let server = &app.server;
    let cookie = login(server).await;

    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(add_item(server, &cookie, &format!("Barang {n}"), 1000.0 + n as f64).await);
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let body: Value = server
            .get(api::items::LIST)
            .add_query_param("page", page)
            .add_query_param("limit", 2)
            .await
            .json();
        assert_eq!(body["total"], 5);
        assert_eq!(body["hasMore"], page < 3);
        for item in body["items"].as_array().expect("items array") {
            seen.push(item["id"].as_str().expect("id").to_string());
        }
    }
    assert_eq!(seen, ids);

    let clamped: Value = server
        .get(api::items::LIST)
        .add_query_param("page", "-4")
        .add_query_param("limit", "999")
        .await
        .json();
    assert_eq!(clamped["page"], 1);
    assert_eq!(clamped["limit"], 50);

    let garbage: Value = server
        .get(api::items::LIST)
        .add_query_param("page", "dua")
        .await
        .json();
    assert_eq!(garbage["page"], 1);
    assert_eq!(garbage["items"].as_array().map(Vec::len), Some(5));
    Ok(())
}

#[tokio::test]
async fn full_primary_spills_into_overflow() -> Result<()> {
    let mut config = test_config();
    // Threshold of 1500 bytes: room for a couple of small items only.
    config.store.value_cap_bytes = 3000;
    config.store.threshold_ratio = 0.5;
    let app = build_test_app_with(config, MemoryStore::with_value_cap(3000)).await?;
    let server = &app.server;
    let cookie = login(server).await;

    let mut partitions = Vec::new();
    for n in 0..8 {
        let response = server
            .post(api::items::ADD)
            .add_header("cookie", cookie.clone())
            .json(&item_body(&format!("Barang {n}"), 500.0))
            .await;
        response.assert_status_ok();
        partitions.push(response.json::<Value>()["storedIn"].as_str().unwrap().to_string());
    }

    assert_eq!(partitions.first().map(String::as_str), Some("primary"));
    assert!(partitions.iter().any(|p| p == "overflow"));
    let first_overflow = partitions.iter().position(|p| p == "overflow").unwrap();
    assert!(partitions[first_overflow..].iter().all(|p| p == "overflow"));

    let list: Value = server
        .get(api::items::LIST)
        .add_query_param("limit", 50)
        .await
        .json();
    assert_eq!(list["total"], 8);

    let stats = app.state.catalog.repository().stats().await?;
    assert!(stats.iter().all(|s| s.bytes < 3000));
    Ok(())
}

#[tokio::test]
async fn list_is_cached_until_a_write() -> Result<()> {
    let mut config = test_config();
    config.cache.enabled = true;
    let app = build_test_app_with(config, MemoryStore::new()).await?;
    let server = &app.server;
    let cookie = login(server).await;

    let first = server.get(api::items::LIST).await;
    first.assert_status_ok();
    assert_eq!(first.header("cache-control"), "public, max-age=60");
    assert_eq!(first.json::<Value>()["total"], 0);

    add_item(server, &cookie, "Teh", 8000.0).await;

    let second: Value = server.get(api::items::LIST).await.json();
    assert_eq!(second["total"], 1);
    Ok(())
}
