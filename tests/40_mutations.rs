mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn post(token: &str, url: String, payload: Value) -> Result<(StatusCode, Value)> {
    let res = reqwest::Client::new().post(url).bearer_auth(token).json(&payload).send().await?;
    let status = res.status();
    Ok((status, res.json::<Value>().await?))
}

#[tokio::test]
async fn create_chain_shows_up_in_views() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::register(server, "builder@example.com").await?;

    let (status, vendor) = post(&token, server.url("/api/vendors"), json!({"name": "Initech", "website": "initech.example"})).await?;
    assert_eq!(status, StatusCode::CREATED);
    let vendor_id = vendor["data"]["id"].as_i64().unwrap();
    assert!(vendor["data"]["user_id"].is_string());

    let (status, software) = post(&token, server.url("/api/software"), json!({"name": "TPS Reporter", "version": "3.1", "vendor_id": vendor_id})).await?;
    assert_eq!(status, StatusCode::CREATED);
    let software_id = software["data"]["id"].as_i64().unwrap();

    let (status, vulnerability) = post(
        &token,
        server.url("/api/vulnerabilities"),
        json!({"software_id": software_id, "cve_id": "CVE-2025-1000", "severity": "high", "cvss_score": 8.1}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vulnerability["data"]["severity"], "High");
    assert!(vulnerability["data"]["published"].is_string());
    let vulnerability_id = vulnerability["data"]["id"].as_i64().unwrap();

    let (status, _) = post(&token, server.url(&format!("/api/vulnerabilities/{}/threats", vulnerability_id)), json!({"threat_id": 30})).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post(&token, server.url(&format!("/api/vulnerabilities/{}/threats", vulnerability_id)), json!({"threat_id": 30})).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, patch) = post(
        &token,
        server.url("/api/patches"),
        json!({"vulnerability_id": vulnerability_id, "url": "https://initech.example/fix", "released": "2025-01-01T00:00:00Z"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let nested = &patch["data"]["vulnerability"];
    assert_eq!(nested["cve_id"], "CVE-2025-1000");
    assert_eq!(nested["software"]["vendor"]["name"], "Initech");
    assert_eq!(nested["threats"][0]["threat_type"]["name"], "Ransomware");

    let software = common::list(server, "/api/software").await?;
    let created = software.iter().find(|s| s["id"] == software_id).unwrap();
    assert_eq!(created["vendor_name"], "Initech");
    assert_eq!(created["vulnerability_count"], 1);
    Ok(())
}

#[tokio::test]
async fn create_validates_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::register(server, "validator@example.com").await?;

    let (status, body) = post(&token, server.url("/api/vulnerabilities"), json!({"summary": "no ids"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["software_id"].is_string());
    assert!(body["field_errors"]["cve_id"].is_string());

    let (status, body) = post(
        &token,
        server.url("/api/vulnerabilities"),
        json!({"software_id": 10, "cve_id": "CVE-2025-2000", "severity": "urgent", "cvss_score": 11.0}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["severity"].is_string());
    assert!(body["field_errors"]["cvss_score"].is_string());

    let (status, body) = post(&token, server.url("/api/software"), json!({"name": "Ghost", "vendor_id": 9999})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["vendor_id"].is_string());

    let res = reqwest::Client::new()
        .post(server.url("/api/threat-types"))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_reports_missing_and_referenced_rows() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::register(server, "janitor@example.com").await?;
    let client = reqwest::Client::new();

    let res = client.delete(server.url("/api/software/11")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.delete(server.url("/api/patches/41")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.delete(server.url("/api/patches/41")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(server.url("/api/threats/424242")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn chat_is_unavailable_without_a_model_key() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::register(server, "curious@example.com").await?;

    let (status, _) = post(&token, server.url("/api/chat"), json!({"message": ""})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&token, server.url("/api/chat"), json!({"message": "What is CVE-2021-44228?"})).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}
