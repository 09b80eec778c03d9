//! Database-backed scenarios: registration conflicts, cross-tenant
//! ownership, and listing order. Skipped unless DATABASE_URL is set,
//! since they need a reachable postgres behind the spawned server.

mod common;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn database_available() -> bool {
    if std::env::var("DATABASE_URL").is_ok() {
        return true;
    }
    eprintln!("skipping: DATABASE_URL not set");
    false
}

/// Unique per-run email so repeated runs against the same database
/// never collide with earlier rows.
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}@example.com", tag, nanos)
}

/// Client with a cookie store, so the session cookies from registration
/// ride along on subsequent requests like a browser would send them.
fn session_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().cookie_store(true).build()?)
}

async fn register(client: &reqwest::Client, base_url: &str, email: &str) -> Result<reqwest::Response> {
    Ok(client
        .post(format!("{}/auth/user", base_url))
        .json(&json!({ "name": "Test User", "email": email, "password": "hunter2!" }))
        .send()
        .await?)
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> Result<()> {
    if !database_available() {
        return Ok(());
    }
    let server = common::spawn_server().await?;
    let email = unique_email("dup");

    let first = register(&session_client()?, &server.base_url, &email).await?;
    assert_eq!(first.status(), StatusCode::OK);
    let cookies: Vec<String> = first
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));

    let second = register(&session_client()?, &server.base_url, &email).await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = second.json::<Value>().await?;
    assert_eq!(body["message"], "Email already in use");
    Ok(())
}

#[tokio::test]
async fn child_resources_cannot_attach_to_another_users_factory() -> Result<()> {
    if !database_available() {
        return Ok(());
    }
    let server = common::spawn_server().await?;

    // User A owns a factory
    let alice = session_client()?;
    register(&alice, &server.base_url, &unique_email("alice")).await?;
    let res = alice
        .post(format!("{}/configs/factory", server.base_url))
        .json(&json!({ "name": "Alpha Plant" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let alice_factory = res.json::<Value>().await?;
    let alice_factory_id = alice_factory["id"].as_i64().expect("factory id");

    // User B cannot hang a location or worker off it
    let bob = session_client()?;
    register(&bob, &server.base_url, &unique_email("bob")).await?;

    let res = bob
        .post(format!("{}/configs/location", server.base_url))
        .json(&json!({ "name": "Dock", "factoryId": alice_factory_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Factory not found or does not belong to user");

    let res = bob
        .post(format!("{}/configs/worker", server.base_url))
        .json(&json!({
            "name": "Jane Doe",
            "employeeId": "E-77",
            "factoryId": alice_factory_id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Factory not found or does not belong to user");

    // Against their own factory the same requests succeed
    let res = bob
        .post(format!("{}/configs/factory", server.base_url))
        .json(&json!({ "name": "Beta Plant" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let bob_factory_id = res.json::<Value>().await?["id"].as_i64().expect("factory id");

    let res = bob
        .post(format!("{}/configs/location", server.base_url))
        .json(&json!({ "name": "Dock", "factoryId": bob_factory_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn factory_listing_is_ordered_and_stable() -> Result<()> {
    if !database_available() {
        return Ok(());
    }
    let server = common::spawn_server().await?;

    let client = session_client()?;
    register(&client, &server.base_url, &unique_email("list")).await?;

    // Created out of name order on purpose
    for name in ["Plant B", "Plant A"] {
        let res = client
            .post(format!("{}/configs/factory", server.base_url))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let first = client
        .get(format!("{}/configs/factory", server.base_url))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::OK);
    let first = first.json::<Value>().await?;

    let names: Vec<&str> = first
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(names, ["Plant A", "Plant B"]);

    // Same request again returns the identical body
    let second = client
        .get(format!("{}/configs/factory", server.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn feed_for_fresh_user_is_empty() -> Result<()> {
    if !database_available() {
        return Ok(());
    }
    let server = common::spawn_server().await?;

    let client = session_client()?;
    register(&client, &server.base_url, &unique_email("feed")).await?;

    let res = client
        .get(format!("{}/feed", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!([]));
    Ok(())
}
