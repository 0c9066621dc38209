#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use img_annotate_api::{app, config::AppConfig, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the router in-process on a free port with in-memory stores.
/// The listener is bound before returning, so the server is ready.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::development()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    let router = app(AppState::in_memory(config));

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Ok(TestServer { port, base_url, handle })
}

/// Client that keeps the session cookie and does not follow redirects
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("reqwest client")
}

/// Register `usr` and return the `{uid, usr}` body
pub async fn register(server: &TestServer, client: &Client, usr: &str, pwd: &str) -> Result<Value> {
    let res = client
        .post(server.url("/api/registration"))
        .json(&json!({ "usr": usr, "pwd": pwd }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "registration failed: {}", res.status());
    Ok(res.json::<Value>().await?)
}

/// Register and create one project, returning (uid, pid)
pub async fn user_with_project(server: &TestServer, client: &Client, usr: &str, prj: &str) -> Result<(String, String)> {
    let user = register(server, client, usr, "secret").await?;
    let uid = user["uid"].as_str().context("uid")?.to_string();

    let res = client
        .post(server.url("/api/projects/create"))
        .json(&json!({ "uid": uid, "prj": prj }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "project create failed: {}", res.status());
    let project = res.json::<Value>().await?;
    let pid = project["pid"].as_str().context("pid")?.to_string();

    Ok((uid, pid))
}
