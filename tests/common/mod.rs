#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/seed.json");
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vulntracker-api"));
        cmd.args(["--port", &port.to_string(), "--bind", "127.0.0.1", "--fixtures", fixtures])
            .env("APP_ENV", "development")
            .env_remove("GOOGLE_API_KEY")
            .env_remove("JWT_SECRET_KEY")
            .env_remove("API_ENABLE_RATE_LIMITING")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a fresh account and return its bearer token.
pub async fn register(server: &TestServer, email: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/api/auth/register"))
        .json(&json!({"email": email, "password": "correct horse battery"}))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
    let body = res.json::<Value>().await?;
    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("register response has no token")
}

/// `data` array of a successful list response.
pub async fn list(server: &TestServer, path: &str) -> Result<Vec<Value>> {
    let res = reqwest::Client::new().get(server.url(path)).send().await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "GET {} returned {}", path, res.status());
    let body = res.json::<Value>().await?;
    anyhow::ensure!(body["success"] == true, "GET {} not successful: {}", path, body);
    Ok(body["data"].as_array().cloned().unwrap_or_default())
}
