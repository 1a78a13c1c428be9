mod common;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn create_assigns_server_side_id_and_timestamps() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/columns", server.base_url))
        .json(&json!({ "name": "Todo", "frameId": "frame-1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Todo");
    assert_eq!(body["frameId"], "frame-1");
    assert_eq!(body["tickets"], json!([]));
    assert!(!body["id"].as_str().unwrap().is_empty());

    // both timestamps parse and are equal at creation
    let created: DateTime<Utc> = body["createdAt"].as_str().unwrap().parse()?;
    let updated: DateTime<Utc> = body["updatedAt"].as_str().unwrap().parse()?;
    assert_eq!(created, updated);

    // the new row shows up on a by-id read and in the listing
    let id = body["id"].as_str().unwrap();
    let fetched = client
        .get(format!("{}/api/columns/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(fetched.json::<Value>().await?["id"], body["id"]);

    let listing = client
        .get(format!("{}/api/columns", server.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(listing
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["id"] == body["id"]));
    Ok(())
}

#[tokio::test]
async fn create_reports_every_violated_field() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/columns", server.base_url))
        .json(&json!({ "tickets": "not-an-array" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "frameId", "tickets"]);
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_404_with_an_error_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/columns/no-such-id", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.json::<Value>().await?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn patch_updates_fields_and_bumps_updated_at() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/api/columns", server.base_url))
        .json(&json!({ "name": "Todo", "frameId": "frame-2" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let res = client
        .patch(format!("{}/api/columns/{}", server.base_url, id))
        .json(&json!({ "name": "Doing", "tickets": ["t1", "t2"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Doing");
    assert_eq!(body["frameId"], "frame-2");
    assert_eq!(body["tickets"], json!(["t1", "t2"]));

    let before: DateTime<Utc> = created["updatedAt"].as_str().unwrap().parse()?;
    let after: DateTime<Utc> = body["updatedAt"].as_str().unwrap().parse()?;
    assert!(after > before);
    assert_eq!(body["createdAt"], created["createdAt"]);
    Ok(())
}

#[tokio::test]
async fn empty_patch_is_a_validation_failure() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/api/columns", server.base_url))
        .json(&json!({ "name": "Todo", "frameId": "frame-3" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .patch(format!("{}/api/columns/{}", server.base_url, id))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_is_204_without_a_body_then_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/api/columns", server.base_url))
        .json(&json!({ "name": "Done", "frameId": "frame-4" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/columns/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty(), "204 must carry no body");

    // the row is gone: deleting again (or reading) is 404
    let res = client
        .delete(format!("{}/api/columns/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/columns/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
