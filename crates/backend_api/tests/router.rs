//! Integration tests for the results API: routes, status codes and JSON shapes.

use std::sync::Arc;

use ai_client::{AssistantClient, ClientError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use backend_api::{create_router, AppState};
use models::AnalysisResult;
use serde_json::{json, Value};
use session::{ChatSession, DoubtStore, ResultContext};
use storage::MemoryStore;
use tower::ServiceExt;

struct EchoAssistant;

#[async_trait]
impl AssistantClient for EchoAssistant {
    async fn ask(&self, query: &str, results: &AnalysisResult) -> ai_client::Result<String> {
        if query.contains("fail") {
            return Err(ClientError::Service("model unavailable".into()));
        }
        Ok(format!("{query} -> {} transactions", results.transaction_count))
    }
}

fn make_state() -> AppState {
    AppState::new(
        ResultContext::in_memory(),
        DoubtStore::new(Arc::new(MemoryStore::new())),
        ChatSession::new(Arc::new(EchoAssistant)),
    )
}

fn sample_result() -> Value {
    json!({
        "total_waste": 15000.0,
        "transaction_count": 42,
        "category_summary": {
            "repeating_charges": {"count": 2, "total": 1200.0},
            "fees": {"count": 3, "total": 450.0}
        },
        "top_merchants": [
            {"name": "Netflix", "count": 12, "amount": 7788.0},
            {"name": "Swiggy", "count": 30, "amount": 5400.0}
        ],
        "fees": [
            {"line": "ATM WDL CHG", "amount": 150.0}
        ],
        "alerts": [
            {"title": "Duplicate subscription", "severity": "medium"},
            {"title": "Late payment penalty", "severity": "critical"}
        ]
    })
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
    let app = create_router(state.clone());
    let resp = ServiceExt::<Request<Body>>::oneshot(app, req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn load_sample(state: &AppState) {
    let (status, _) = send(state, request("POST", "/api/results", Some(sample_result()))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send(&make_state(), request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_views_without_result_redirect_to_upload() {
    let state = make_state();
    for uri in ["/api/results", "/api/dashboard", "/api/summary", "/api/alerts", "/api/charts"] {
        let (status, json) = send(&state, request("GET", uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["redirect"], "/");
    }
}

#[tokio::test]
async fn test_load_returns_summary() {
    let state = make_state();
    let (status, json) = send(&state, request("POST", "/api/results", Some(sample_result()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["total_waste_display"], "₹15,000");
    assert_eq!(json["transaction_count"], 42);
    assert_eq!(json["categories_with_activity"], 2);
}

#[tokio::test]
async fn test_dashboard_and_alerts() {
    let state = make_state();
    load_sample(&state).await;

    let (status, json) = send(&state, request("GET", "/api/dashboard", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["view"]["merchants"]["items"][0]["name"], "Netflix");
    assert_eq!(json["view"]["penalties"]["rows"]["state"], "empty");
    assert_eq!(json["alerts"]["tier"], "critical");

    let (_, json) = send(&state, request("GET", "/api/alerts", None)).await;
    let titles: Vec<&str> = json["alerts"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Late payment penalty", "Duplicate subscription"]);
    assert_eq!(json["counts"]["critical"], 1);
}

#[tokio::test]
async fn test_charts() {
    let state = make_state();
    load_sample(&state).await;

    let (status, json) = send(&state, request("GET", "/api/charts", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["merchants"]["state"], "series");
    assert_eq!(json["merchants"]["points"][0]["label"], "Netflix");
    assert_eq!(json["categories"]["state"], "series");
}

#[tokio::test]
async fn test_clear_result_ends_session() {
    let state = make_state();
    load_sample(&state).await;

    let (status, _) = send(&state, request("DELETE", "/api/results", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&state, request("GET", "/api/dashboard", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_flow() {
    let state = make_state();

    let (status, _) = send(&state, request("POST", "/api/chat", Some(json!({"query": "why?"})))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    load_sample(&state).await;
    let (status, json) = send(&state, request("POST", "/api/chat", Some(json!({"query": "why?"})))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ask"]["outcome"], "answered");
    assert_eq!(json["messages"][0]["sender"], "user");
    assert_eq!(json["messages"][1]["text"], "why? -&gt; 42 transactions");

    let (_, json) = send(&state, request("POST", "/api/chat", Some(json!({"query": "   "})))).await;
    assert_eq!(json["ask"]["reason"], "empty_query");
    assert_eq!(json["messages"].as_array().unwrap().len(), 2);

    let (_, json) = send(&state, request("POST", "/api/chat", Some(json!({"query": "please fail"})))).await;
    assert_eq!(json["ask"]["outcome"], "failed");
    assert_eq!(json["messages"][3]["is_error"], true);

    let (_, json) = send(&state, request("GET", "/api/chat", None)).await;
    assert_eq!(json["messages"].as_array().unwrap().len(), 4);
    assert!(json.get("ask").is_none());
}

#[tokio::test]
async fn test_loading_new_result_resets_chat() {
    let state = make_state();
    load_sample(&state).await;
    send(&state, request("POST", "/api/chat", Some(json!({"query": "hi"})))).await;

    load_sample(&state).await;
    let (_, json) = send(&state, request("GET", "/api/chat", None)).await;
    assert!(json["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_doubts_crud() {
    let state = make_state();

    let (_, json) = send(&state, request("GET", "/api/doubts", None)).await;
    assert_eq!(json["state"], "empty");
    assert_eq!(json["placeholder"], "No queries added yet");

    let (status, json) = send(&state, request("POST", "/api/doubts", Some(json!({"text": "  "})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please enter a doubt or query");

    let (status, created) = send(
        &state,
        request("POST", "/api/doubts", Some(json!({"text": "Is <this> fee refundable?"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, json) = send(&state, request("POST", &format!("/api/doubts/{id}/toggle"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["resolved"], true);
    assert_eq!(json["items"][0]["text"], "Is &lt;this&gt; fee refundable?");

    let (status, _) = send(&state, request("DELETE", &format!("/api/doubts/{id}"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, json) = send(&state, request("GET", "/api/doubts", None)).await;
    assert_eq!(json["state"], "empty");
}

#[tokio::test]
async fn test_doubt_with_malformed_id_is_rejected() {
    let state = make_state();
    let resp = ServiceExt::<Request<Body>>::oneshot(
        create_router(state),
        request("DELETE", "/api/doubts/not-a-uuid", None),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
