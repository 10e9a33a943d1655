//! API integration tests

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use warehouse_server::models::user::UserClaims;

const BASE_URL: &str = "http://localhost:10000/api/v1";

/// Mint a token signed with the server's secret
fn auth_token() -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now();
    UserClaims {
        id: 1,
        email: "staff@example.com".to_string(),
        role: "staff".to_string(),
        name: None,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

async fn create_equipment(client: &Client, token: &str, total: i32) -> i64 {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": "Line array speaker", "total_quantity": total }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn create_project(client: &Client, token: &str, start: &str, end: &str) -> i64 {
    let response = client
        .post(format!("{}/projects", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "Spring expo",
            "status": "confirmed",
            "usage_start_at": start,
            "usage_end_at": end,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn set_items(client: &Client, token: &str, project_id: i64, equipment_id: i64, quantity: i32) {
    let response = client
        .put(format!("{}/projects/{}/items", BASE_URL, project_id))
        .bearer_auth(token)
        .json(&json!({ "items": [{ "equipment_id": equipment_id, "quantity": quantity }] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_requires_bearer_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/projects", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_naive_instant_rejected() {
    let client = Client::new();
    let token = auth_token();

    let response = client
        .post(format!("{}/projects", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Naive",
            "usage_start": "2026-02-19T10:00:00",
            "usage_end": "2026-02-19T18:00:00",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_projects_are_short() {
    let client = Client::new();
    let token = auth_token();

    let equipment_id = create_equipment(&client, &token, 5).await;
    let first = create_project(&client, &token, "2031-05-01T10:00:00+09:00", "2031-05-01T14:00:00+09:00").await;
    let second = create_project(&client, &token, "2031-05-01T12:00:00+09:00", "2031-05-01T16:00:00+09:00").await;
    let touching = create_project(&client, &token, "2031-05-01T16:00:00+09:00", "2031-05-01T18:00:00+09:00").await;
    set_items(&client, &token, first, equipment_id, 3).await;
    set_items(&client, &token, second, equipment_id, 3).await;
    set_items(&client, &token, touching, equipment_id, 3).await;

    let response = client
        .get(format!("{}/shortages", BASE_URL))
        .bearer_auth(&token)
        .query(&[("project_id", first.to_string())])
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let report = &body["projects"][0];
    assert_eq!(report["project_id"], first);
    assert_eq!(report["shortage"], true);
    let detail = report["shortage_details"]
        .as_array()
        .and_then(|d| d.iter().find(|d| d["equipment_id"] == equipment_id))
        .expect("No detail for equipment");
    assert_eq!(detail["max_overlapping_demand"], 6);

    let response = client
        .get(format!("{}/shortages", BASE_URL))
        .bearer_auth(&token)
        .query(&[("project_id", touching.to_string())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let details = body["projects"][0]["shortage_details"].as_array().cloned().unwrap_or_default();
    assert!(details.iter().all(|d| d["equipment_id"] != equipment_id));
}

#[tokio::test]
#[ignore]
async fn test_calendar_week_view() {
    let client = Client::new();
    let token = auth_token();

    let response = client
        .get(format!("{}/calendar", BASE_URL))
        .bearer_auth(&token)
        .query(&[("mode", "week"), ("date", "2031-05-01")])
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["mode"], "week");
    assert_eq!(body["start"], "2031-04-28");
    assert_eq!(body["previous"], "2031-04-24");
    assert_eq!(body["next"], "2031-05-08");
    assert_eq!(body["days"].as_array().map(|d| d.len()), Some(7));
}

#[tokio::test]
#[ignore]
async fn test_calendar_rejects_malformed_date() {
    let client = Client::new();
    let token = auth_token();

    let response = client
        .get(format!("{}/calendar", BASE_URL))
        .bearer_auth(&token)
        .query(&[("date", "05/01/2031")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
