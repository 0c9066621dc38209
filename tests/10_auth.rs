mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn registration_opens_a_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let user = common::register(&server, &client, "ada", "lovelace").await?;
    assert_eq!(user["usr"], "ada");
    assert!(user["uid"].is_string());

    let res = client.post(server.url("/api/session")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let session = res.json::<Value>().await?;
    assert_eq!(session, user);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    common::register(&server, &client, "ada", "lovelace").await?;

    let res = common::client()
        .post(server.url("/api/registration"))
        .json(&json!({ "usr": "ada", "pwd": "other" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], 400);
    assert_eq!(body["name"], "Bad Request");
    assert_eq!(body["description"], "Username already exists.");
    Ok(())
}

#[tokio::test]
async fn login_returns_registered_user_id() -> Result<()> {
    let server = common::spawn_server().await?;
    let registered = common::register(&server, &common::client(), "ada", "lovelace").await?;

    let client = common::client();
    let res = client
        .post(server.url("/api/login"))
        .json(&json!({ "usr": "ada", "pwd": "lovelace" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login = res.json::<Value>().await?;
    assert_eq!(login["uid"], registered["uid"]);
    assert_eq!(login["usr"], "ada");

    let res = client.post(server.url("/api/session")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_gives_401_and_no_session() -> Result<()> {
    let server = common::spawn_server().await?;
    common::register(&server, &common::client(), "ada", "lovelace").await?;

    let client = common::client();
    let res = client
        .post(server.url("/api/login"))
        .json(&json!({ "usr": "ada", "pwd": "babbage" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get("set-cookie").is_none());

    let res = client.post(server.url("/api/session")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_user_gives_400() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::client()
        .post(server.url("/api/login"))
        .json(&json!({ "usr": "nobody", "pwd": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["description"], "User not found.");
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_bad_requests() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::client()
        .post(server.url("/api/login"))
        .json(&json!({ "usr": "ada" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_redirects_and_ends_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    common::register(&server, &client, "ada", "lovelace").await?;

    let res = client.get(server.url("/api/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/");

    let res = client.post(server.url("/api/session")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_session_is_rejected() -> Result<()> {
    let mut config = img_annotate_api::config::AppConfig::development();
    config.session.ttl_minutes = 0;
    let server = common::spawn_server_with(config).await?;
    let client = common::client();

    let res = client
        .post(server.url("/api/registration"))
        .json(&json!({ "usr": "ada", "pwd": "lovelace" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.post(server.url("/api/session")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_without_session_still_redirects() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::client().get(server.url("/api/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/");
    Ok(())
}
