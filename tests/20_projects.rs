mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_then_list_projects() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    let (uid, pid) = common::user_with_project(&server, &client, "ada", "birds").await?;

    let res = client
        .post(server.url("/api/projects/create"))
        .json(&json!({ "uid": uid, "prj": "trees" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let trees = res.json::<Value>().await?;
    assert_eq!(trees["prj"], "trees");
    assert_eq!(trees["uid"], uid.as_str());

    let res = client
        .post(server.url("/api/projects/list"))
        .json(&json!({ "uid": uid }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<Vec<Value>>().await?;
    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|p| p["pid"] == pid.as_str() && p["prj"] == "birds"));
    assert!(list.iter().any(|p| p["prj"] == "trees"));
    Ok(())
}

#[tokio::test]
async fn duplicate_project_title_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    let (uid, _) = common::user_with_project(&server, &client, "ada", "birds").await?;

    let res = client
        .post(server.url("/api/projects/create"))
        .json(&json!({ "uid": uid, "prj": "birds" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["description"], "A project with that name already exists.");
    Ok(())
}

#[tokio::test]
async fn same_title_allowed_for_different_users() -> Result<()> {
    let server = common::spawn_server().await?;
    common::user_with_project(&server, &common::client(), "ada", "birds").await?;
    common::user_with_project(&server, &common::client(), "bob", "birds").await?;
    Ok(())
}

#[tokio::test]
async fn projects_require_a_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let res = client
        .post(server.url("/api/projects/list"))
        .json(&json!({ "uid": uuid_like() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["description"], "User unauthorized.");
    Ok(())
}

#[tokio::test]
async fn uid_must_match_session_user() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    common::register(&server, &client, "ada", "lovelace").await?;

    let res = client
        .post(server.url("/api/projects/create"))
        .json(&json!({ "uid": uuid_like(), "prj": "birds" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() -> Result<()> {
    let server = common::spawn_server().await?;
    let ada = common::client();
    let bob = common::client();
    common::user_with_project(&server, &ada, "ada", "birds").await?;
    let bob_info = common::register(&server, &bob, "bob", "builder").await?;

    let res = bob
        .post(server.url("/api/projects/list"))
        .json(&json!({ "uid": bob_info["uid"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.json::<Vec<Value>>().await?.is_empty());
    Ok(())
}

fn uuid_like() -> &'static str {
    "00000000-0000-4000-8000-000000000000"
}
