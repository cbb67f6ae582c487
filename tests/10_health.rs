mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_reports_memory_store() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_and_docs_are_public() -> Result<()> {
    let server = common::ensure_server().await?;

    let root = reqwest::get(server.url("/")).await?.json::<serde_json::Value>().await?;
    assert_eq!(root["data"]["name"], "VulnTracker API");

    let docs = reqwest::get(server.url("/api/docs")).await?;
    assert_eq!(docs.status(), StatusCode::OK);
    let docs = docs.json::<serde_json::Value>().await?;
    assert!(docs["paths"]["/api/patches"].is_object(), "docs missing patches: {}", docs);
    Ok(())
}
